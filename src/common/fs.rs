use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Read a whole source file into memory, naming it as `what` in the error.
pub(crate) fn read_source(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path)
        .with_context(|| format!("[common::fs] Failed to read {what} file: {}", path.display()))
}

/// Hex-encoded SHA-256 of an in-memory buffer.
pub(crate) fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Create the parent directory of `path` if it doesn't exist; error if a non-directory is there.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else { return Ok(()) };
    if parent.exists() {
        if !parent.is_dir() {
            anyhow::bail!("[common::fs] Path exists but is not a directory: {}", parent.display());
        }
    } else {
        fs::create_dir_all(parent)
            .with_context(|| format!("[common::fs] Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
