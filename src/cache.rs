//! Reuse of parsed source files across renders.

use std::{path::{Path, PathBuf}, sync::Arc};

use anyhow::{Context, Result};

use crate::{common, geometry::FeatureCollection, table::AttributeTable};

/// Identity of a source file: where it lives and what it holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub sha256: String,
}

impl SourceKey {
    fn of(path: &Path, bytes: &[u8]) -> Self {
        Self { path: path.to_path_buf(), sha256: common::sha256_bytes(bytes) }
    }
}

#[derive(Debug)]
struct Entry<T> {
    key: SourceKey,
    value: Arc<T>,
}

/// Holds the last geometry and attribute table loaded.
///
/// Each lookup rereads and hashes the file; parsing happens only when path or content
/// changed. The selected metric is never part of a key, so renders always re-annotate.
#[derive(Debug, Default)]
pub struct DatasetCache {
    geometry: Option<Entry<FeatureCollection>>,
    table: Option<(u8, Entry<AttributeTable>)>,
}

impl DatasetCache {
    pub fn new() -> Self { Self::default() }

    /// The geometry at `path`, parsed at most once per content.
    pub fn geometry(&mut self, path: &Path) -> Result<Arc<FeatureCollection>> {
        let bytes = common::read_source(path, "geometry")?;
        let key = SourceKey::of(path, &bytes);

        if let Some(entry) = self.geometry.as_ref().filter(|e| e.key == key) {
            tracing::debug!(path = %path.display(), "geometry cache hit");
            return Ok(Arc::clone(&entry.value));
        }

        let value = Arc::new(FeatureCollection::from_geojson_bytes(&bytes)
            .with_context(|| format!("[cache] Failed to parse geometry file {}", path.display()))?);
        self.geometry = Some(Entry { key, value: Arc::clone(&value) });
        Ok(value)
    }

    /// The attribute table at `path` read with `delimiter`, parsed at most once per content.
    pub fn table(&mut self, path: &Path, delimiter: u8) -> Result<Arc<AttributeTable>> {
        let bytes = common::read_source(path, "attribute")?;
        let key = SourceKey::of(path, &bytes);

        if let Some((_, entry)) = self.table.as_ref().filter(|(d, e)| *d == delimiter && e.key == key) {
            tracing::debug!(path = %path.display(), "attribute cache hit");
            return Ok(Arc::clone(&entry.value));
        }

        let value = Arc::new(AttributeTable::from_csv_bytes(&bytes, delimiter)
            .with_context(|| format!("[cache] Failed to parse attribute file {}", path.display()))?);
        self.table = Some((delimiter, Entry { key, value: Arc::clone(&value) }));
        Ok(value)
    }

    /// Keys of the cached sources, geometry first.
    pub fn keys(&self) -> (Option<&SourceKey>, Option<&SourceKey>) {
        (self.geometry.as_ref().map(|e| &e.key), self.table.as_ref().map(|(_, e)| &e.key))
    }

    /// Drop everything cached.
    pub fn invalidate(&mut self) {
        self.geometry = None;
        self.table = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GEOJSON: &str = r#"{"type":"FeatureCollection","features":[]}"#;

    #[test]
    fn unchanged_files_are_reused() {
        let dir = tempfile::tempdir().unwrap();
        let geo = dir.path().join("dptos.geojson");
        let csv = dir.path().join("atributos.csv");
        fs::write(&geo, GEOJSON).unwrap();
        fs::write(&csv, "COD,POP\n05,1\n").unwrap();

        let mut cache = DatasetCache::new();
        let g1 = cache.geometry(&geo).unwrap();
        let g2 = cache.geometry(&geo).unwrap();
        assert!(Arc::ptr_eq(&g1, &g2));

        let t1 = cache.table(&csv, b',').unwrap();
        let t2 = cache.table(&csv, b',').unwrap();
        assert!(Arc::ptr_eq(&t1, &t2));
        assert_eq!(cache.keys().1.unwrap().path, csv);
    }

    #[test]
    fn changed_content_or_delimiter_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("atributos.csv");
        fs::write(&csv, "COD,POP\n05,1\n").unwrap();

        let mut cache = DatasetCache::new();
        let t1 = cache.table(&csv, b',').unwrap();
        fs::write(&csv, "COD,POP\n05,2\n").unwrap();
        let t2 = cache.table(&csv, b',').unwrap();
        assert!(!Arc::ptr_eq(&t1, &t2));
        assert_eq!(t2.records()[0].get("POP"), Some("2"));

        let t3 = cache.table(&csv, b';').unwrap();
        assert!(!Arc::ptr_eq(&t2, &t3));
        assert_eq!(t3.columns(), ["COD,POP"]);
    }

    #[test]
    fn invalidate_forces_reparse() {
        let dir = tempfile::tempdir().unwrap();
        let geo = dir.path().join("dptos.geojson");
        fs::write(&geo, GEOJSON).unwrap();

        let mut cache = DatasetCache::new();
        let g1 = cache.geometry(&geo).unwrap();
        cache.invalidate();
        assert_eq!(cache.keys(), (None, None));
        let g2 = cache.geometry(&geo).unwrap();
        assert!(!Arc::ptr_eq(&g1, &g2));
        assert_eq!(*g1, *g2);
    }

    #[test]
    fn unparsable_geometry_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let geo = dir.path().join("broken.geojson");
        fs::write(&geo, "{").unwrap();
        let err = DatasetCache::new().geometry(&geo).unwrap_err();
        assert!(format!("{err:#}").contains("broken.geojson"));
    }
}
