//! JSON-lines log of validation failures.
//!
//! The log is truncated once when a build starts ([`ValidationLog::create`])
//! and every invalid item is appended as one line afterwards. The console
//! only ever shows counts; this file carries the full diagnostics.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use faqkit_shared::{FaqkitError, Result, ValidationIssue};
use serde::{Deserialize, Serialize};

/// One invalid item as recorded in the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationLogEntry {
    pub timestamp: DateTime<Utc>,
    /// Free-form context (usually the content type name).
    pub context: String,
    pub schema: String,
    /// Position of the item in the validated batch.
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub errors: Vec<ValidationIssue>,
}

/// Handle to the validation log of the current build.
#[derive(Debug, Clone)]
pub struct ValidationLog {
    path: PathBuf,
}

impl ValidationLog {
    /// Create (or truncate) the log file, creating parent directories.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| FaqkitError::io(parent, e))?;
            }
        }
        std::fs::File::create(&path).map_err(|e| FaqkitError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "validation log reset");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single JSON line.
    pub fn append(&self, entry: &ValidationLogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)
            .map_err(|e| FaqkitError::Serialization(e.to_string()))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| FaqkitError::io(&self.path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| FaqkitError::io(&self.path, e))
    }

    /// Read every entry back (used by `check` output and tests).
    pub fn read_entries(&self) -> Result<Vec<ValidationLogEntry>> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| FaqkitError::io(&self.path, e))?;
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).map_err(|e| {
                    FaqkitError::validation(format!(
                        "corrupt line in {}: {e}",
                        self.path.display()
                    ))
                })
            })
            .collect()
    }
}
