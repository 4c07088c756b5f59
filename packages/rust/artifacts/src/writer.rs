//! Atomic JSON writers.

use std::path::{Path, PathBuf};

use faqkit_shared::{FaqkitError, Result};
use serde::Serialize;
use tracing::debug;

/// Write `data` as pretty JSON to `path`.
///
/// Parent directories are created. The content goes to a hidden temp file
/// next to the target first and is renamed into place, so readers never see
/// a half-written file.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| FaqkitError::Serialization(format!("{}: {e}", path.display())))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| FaqkitError::io(parent, e))?;
        }
    }

    let temp = temp_path(path);
    std::fs::write(&temp, json.as_bytes()).map_err(|e| FaqkitError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| FaqkitError::io(path, e))?;

    debug!(path = %path.display(), bytes = json.len(), "wrote JSON file");
    Ok(())
}

/// Write a debug snapshot as `<dir>/<name>.json` and return its path.
pub fn write_debug_snapshot<T: Serialize + ?Sized>(
    dir: &Path,
    name: &str,
    data: &T,
) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.json"));
    write_json(&path, data)?;
    Ok(path)
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("faqkit-writer-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn write_json_creates_parents_and_leaves_no_temp() {
        let tmp = temp_dir();
        let target = tmp.join("build/nested/site-data.json");

        write_json(&target, &serde_json::json!({"faqs": {}})).unwrap();

        let content = std::fs::read_to_string(&target).unwrap();
        assert!(content.contains("\"faqs\""));

        for entry in std::fs::read_dir(target.parent().unwrap()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.starts_with('.'), "temp file left behind: {name}");
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_json_overwrites() {
        let tmp = temp_dir();
        let target = tmp.join("out.json");

        write_json(&target, &vec![1, 2, 3]).unwrap();
        write_json(&target, &vec![4]).unwrap();

        let parsed: Vec<u32> =
            serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(parsed, vec![4]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn debug_snapshot_path() {
        let tmp = temp_dir();
        let path = write_debug_snapshot(&tmp, "faqs", &serde_json::json!([])).unwrap();
        assert_eq!(path, tmp.join("faqs.json"));
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
