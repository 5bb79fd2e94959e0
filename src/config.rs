//! Pipeline settings, loadable from a JSON file.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::{choropleth::PALETTE, common};

/// Region-code aliases first, then region-name aliases.
const GEO_KEY_CANDIDATES: &[&str] = &[
    "DPTO_CCDGO", "DPTO_CODIGO", "COD_DPTO", "CODIGO_DEPARTAMENTO", "DPTO",
    "DPTO_CNMBR", "NOMBRE_DPT", "DEPARTAMENTO", "NOMBRE",
];

const DEFAULT_METRICS: &[&str] = &["DIRECTORIO"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChoroplethConfig {
    /// Prioritized property names identifying a region in the geometry.
    pub geo_key_candidates: Vec<String>,
    /// Metric columns to select by default, in order of preference.
    pub default_metrics: Vec<String>,
    /// Field separator of the attribute file.
    pub delimiter: char,
    /// Records inspected per column when detecting numeric columns.
    pub sample_rows: usize,
    /// Number of quantile classes.
    pub classes: usize,
}

impl Default for ChoroplethConfig {
    fn default() -> Self {
        Self {
            geo_key_candidates: GEO_KEY_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            default_metrics: DEFAULT_METRICS.iter().map(|s| s.to_string()).collect(),
            delimiter: ',',
            sample_rows: 50,
            classes: PALETTE.len(),
        }
    }
}

impl ChoroplethConfig {
    /// Read settings from a JSON file; omitted fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = common::read_source(path, "config")?;
        let config: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("[config] Failed to parse config file {}", path.display()))?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// Read from `path` when given, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_json_file)
    }

    /// The delimiter as a single byte, as the CSV reader needs it.
    pub fn delimiter_byte(&self) -> Result<u8> {
        ensure!(self.delimiter.is_ascii(), "[config] Delimiter must be a single ASCII character, got {:?}", self.delimiter);
        Ok(self.delimiter as u8)
    }

    /// Class count clamped to what the palette can color.
    pub fn class_count(&self) -> usize {
        self.classes.clamp(1, PALETTE.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"delimiter": ";", "default_metrics": ["POB"]}"#).unwrap();

        let config = ChoroplethConfig::from_json_file(&path).unwrap();
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert_eq!(config.default_metrics, ["POB"]);
        assert_eq!(config.sample_rows, 50);
        assert_eq!(config.geo_key_candidates[0], "DPTO_CCDGO");
    }

    #[test]
    fn unknown_fields_and_non_ascii_delimiters_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"delimeter": ";"}"#).unwrap();
        assert!(ChoroplethConfig::from_json_file(&path).is_err());
        std::fs::write(&path, r#"{"delimiter": "¦"}"#).unwrap();
        assert!(ChoroplethConfig::from_json_file(&path).is_err());
    }

    #[test]
    fn class_count_is_clamped() {
        let mut config = ChoroplethConfig::default();
        assert_eq!(config.class_count(), 5);
        config.classes = 0;
        assert_eq!(config.class_count(), 1);
        config.classes = 12;
        assert_eq!(config.class_count(), 5);
    }

    #[test]
    fn load_without_path_is_default() {
        assert_eq!(ChoroplethConfig::load(None).unwrap(), ChoroplethConfig::default());
    }
}
