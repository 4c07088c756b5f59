//! Schema-set version tag.

use std::path::Path;

use faqkit_shared::{FaqkitError, Result};
use sha2::{Digest, Sha256};

/// Suffix of schema definition files inside the schema directory.
pub const SCHEMA_FILE_SUFFIX: &str = ".schema.json";

/// Hex digits kept from the digest.
const TAG_LEN: usize = 12;

/// Digest of every `*.schema.json` file in `dir` (names and contents, sorted
/// by name). `None` when the directory is missing or holds no schemas.
pub fn schema_set_version(dir: &Path) -> Result<Option<String>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut files: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| FaqkitError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(SCHEMA_FILE_SUFFIX))
        })
        .collect();

    if files.is_empty() {
        return Ok(None);
    }
    files.sort();

    let mut hasher = Sha256::new();
    for path in &files {
        let content = std::fs::read(path).map_err(|e| FaqkitError::io(path, e))?;
        if let Some(name) = path.file_name() {
            hasher.update(name.to_string_lossy().as_bytes());
        }
        hasher.update([0u8]);
        hasher.update(&content);
    }

    let digest = format!("{:x}", hasher.finalize());
    Ok(Some(digest[..TAG_LEN].to_string()))
}
