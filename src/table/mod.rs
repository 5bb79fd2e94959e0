//! Attribute tables: delimited records keyed by column name.

mod classify;
mod numeric;

use std::path::Path;

use ahash::AHashMap;
use anyhow::{Context, Result};
use polars::frame::DataFrame;

use crate::common;

pub use classify::{MetricSelection, classify_columns};
pub use numeric::to_number;

/// One row of the attribute table: column name -> raw (trimmed) cell value.
/// Null cells are absent rather than stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRecord {
    cells: AHashMap<String, String>,
}

impl AttributeRecord {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn get(&self, column: &str) -> Option<&str> { self.cells.get(column).map(String::as_str) }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    #[inline] pub fn len(&self) -> usize { self.cells.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.cells.is_empty() }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

/// Ordered column names plus the records, in file order.
///
/// The column list comes from the header and is fixed once the table is built;
/// a table without records has no columns either.
#[derive(Debug, Clone, Default)]
pub struct AttributeTable {
    columns: Vec<String>,
    records: Vec<AttributeRecord>,
}

impl AttributeTable {
    /// Build a table from explicit columns and records. Cells naming a column
    /// outside `columns` are dropped so every record stays within the column set.
    pub fn new(columns: Vec<String>, records: Vec<AttributeRecord>) -> Self {
        if records.is_empty() { return Self::default() }

        let records = records.into_iter()
            .map(|mut record| {
                record.cells.retain(|k, _| columns.contains(k));
                record
            })
            .collect();

        Self { columns, records }
    }

    /// Read a delimited attribute file (UTF-8, optional BOM, header row).
    pub fn read_csv(path: &Path, delimiter: u8) -> Result<Self> {
        let bytes = common::read_source(path, "attribute")?;
        Self::from_csv_bytes(&bytes, delimiter)
            .with_context(|| format!("[table::read_csv] Failed to parse attribute file {}", path.display()))
    }

    /// Parse a delimited attribute table from memory.
    pub fn from_csv_bytes(bytes: &[u8], delimiter: u8) -> Result<Self> {
        let table = match common::read_string_table(bytes, delimiter)? {
            Some(df) => Self::from_dataframe(&df)?,
            None => Self::default(),
        };
        tracing::debug!(rows = table.len(), columns = table.columns.len(), "attribute table loaded");
        Ok(table)
    }

    /// Convert an all-string DataFrame, trimming header names and cell values.
    fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let columns = df.get_column_names().into_iter()
            .map(|name| name.trim().to_string())
            .collect::<Vec<_>>();

        let series = df.get_columns().iter()
            .map(|col| col.str().context("[table] Expected a string column"))
            .collect::<Result<Vec<_>>>()?;

        let records = (0..df.height())
            .map(|row| {
                columns.iter().zip(&series)
                    .filter_map(|(name, values)| Some((name.clone(), values.get(row)?.trim().to_string())))
                    .collect::<AttributeRecord>()
            })
            .collect();

        Ok(Self::new(columns, records))
    }

    #[inline] pub fn columns(&self) -> &[String] { &self.columns }

    #[inline] pub fn records(&self) -> &[AttributeRecord] { &self.records }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }
}
