//! Delimited text reading operations.

use std::io::Cursor;

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, CsvReader}};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Drop a leading UTF-8 byte-order marker, if present.
pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Read delimited bytes with a header row into a DataFrame whose columns are all strings.
///
/// Schema inference is disabled so codes like `05` keep their leading zeros and
/// decimal-comma values survive untouched for later coercion. Short rows are padded
/// with nulls and long rows truncated instead of failing the whole read.
/// Returns `None` when the input holds nothing but whitespace.
pub(crate) fn read_string_table(bytes: &[u8], delimiter: u8) -> Result<Option<DataFrame>> {
    let bytes = strip_bom(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) { return Ok(None) }

    let options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po
            .with_separator(delimiter)
            .with_truncate_ragged_lines(true));

    let df = CsvReader::new(Cursor::new(bytes))
        .with_options(options)
        .finish()
        .context("[io::csv] Failed to parse delimited table")?;

    Ok(Some(df))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bom_is_stripped_once() {
        assert_eq!(strip_bom(b"\xEF\xBB\xBFCOD,POP"), b"COD,POP");
        assert_eq!(strip_bom(b"COD,POP"), b"COD,POP");
    }

    #[test]
    fn whitespace_only_input_is_no_table() {
        assert!(read_string_table(b"", b',').unwrap().is_none());
        assert!(read_string_table(b"\xEF\xBB\xBF \n", b',').unwrap().is_none());
    }

    #[test]
    fn columns_are_read_as_strings() {
        let df = read_string_table(b"COD;POP\n05;12,5\n", b';').unwrap().unwrap();
        assert_eq!(df.height(), 1);
        let cod = df.column("COD").unwrap().str().unwrap();
        assert_eq!(cod.get(0), Some("05"));
        let pop = df.column("POP").unwrap().str().unwrap();
        assert_eq!(pop.get(0), Some("12,5"));
    }
}
