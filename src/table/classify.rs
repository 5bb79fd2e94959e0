use super::{AttributeTable, to_number};

/// The selectable metric columns and the one selected by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSelection {
    pub metrics: Vec<String>,
    pub default_index: usize,
    /// False when no column held a numeric sample and the list is a fallback.
    pub numeric: bool,
}

impl MetricSelection {
    /// Name of the default metric.
    pub fn default_metric(&self) -> &str { &self.metrics[self.default_index] }

    #[inline] pub fn contains(&self, metric: &str) -> bool { self.metrics.iter().any(|m| m == metric) }
}

/// Decide which non-key columns can be colored by.
///
/// A column qualifies when at least one of the first `sample_rows` records holds a
/// value that coerces to a number. Without any qualifying column, every non-key column
/// is offered, and failing that the key column itself, so the list is never empty.
/// The default is the first of `default_aliases` present in the list, else the first entry.
pub fn classify_columns(table: &AttributeTable, data_key: &str, sample_rows: usize, default_aliases: &[String]) -> MetricSelection {
    let sample = &table.records()[..table.len().min(sample_rows)];
    let candidates = table.columns().iter()
        .filter(|c| c.as_str() != data_key)
        .collect::<Vec<_>>();

    let numeric = candidates.iter()
        .filter(|c| sample.iter().any(|r| r.get(c).and_then(to_number).is_some()))
        .map(|c| c.to_string())
        .collect::<Vec<_>>();

    let (metrics, is_numeric) = if !numeric.is_empty() {
        (numeric, true)
    } else if !candidates.is_empty() {
        tracing::warn!("no numeric column found; offering every non-key column");
        (candidates.into_iter().cloned().collect(), false)
    } else {
        tracing::warn!(key = data_key, "no metric columns available; offering the key column");
        (vec![data_key.to_string()], false)
    };

    let default_index = default_aliases.iter()
        .find_map(|alias| metrics.iter().position(|m| m == alias))
        .unwrap_or(0);

    MetricSelection { metrics, default_index, numeric: is_numeric }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::AttributeRecord;

    fn table(columns: &[&str], rows: &[&[&str]]) -> AttributeTable {
        let records = rows.iter()
            .map(|row| columns.iter().zip(row.iter()).map(|(c, v)| (*c, *v)).collect::<AttributeRecord>())
            .collect();
        AttributeTable::new(columns.iter().map(|c| c.to_string()).collect(), records)
    }

    #[test]
    fn numeric_columns_in_table_order() {
        let t = table(&["COD", "NOMBRE", "POP", "AREA"], &[
            &["05", "ANTIOQUIA", "100", "n/a"],
            &["08", "ATLANTICO", "300", "3,3"],
        ]);
        let sel = classify_columns(&t, "COD", 50, &[]);
        assert_eq!(sel.metrics, ["POP", "AREA"]);
        assert_eq!(sel.default_metric(), "POP");
        assert!(sel.numeric);
    }

    #[test]
    fn only_sampled_rows_count() {
        let t = table(&["COD", "LATE"], &[&["05", "x"], &["08", "x"], &["11", "7"]]);
        let sel = classify_columns(&t, "COD", 2, &[]);
        assert!(!sel.numeric);
        assert_eq!(sel.metrics, ["LATE"]);
        let sel = classify_columns(&t, "COD", 3, &[]);
        assert!(sel.numeric);
    }

    #[test]
    fn default_alias_wins_over_order() {
        let t = table(&["COD", "POP", "DIRECTORIO"], &[&["05", "1", "2"]]);
        let sel = classify_columns(&t, "COD", 50, &["DIRECTORIO".to_string()]);
        assert_eq!(sel.default_metric(), "DIRECTORIO");
        assert_eq!(sel.default_index, 1);
    }

    #[test]
    fn no_non_key_columns_offers_key() {
        let t = table(&["COD"], &[&["05"]]);
        let sel = classify_columns(&t, "COD", 50, &[]);
        assert_eq!(sel.metrics, ["COD"]);
        assert!(!sel.numeric);
    }

    #[test]
    fn empty_table_yields_single_option() {
        let sel = classify_columns(&AttributeTable::default(), "DPTO_CCDGO", 50, &[]);
        assert_eq!(sel.metrics, ["DPTO_CCDGO"]);
        assert_eq!(sel.default_metric(), "DPTO_CCDGO");
    }
}
