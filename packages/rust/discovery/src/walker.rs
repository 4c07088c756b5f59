//! Recursive listing of markdown files below a content type root.

use std::path::{Component, Path};

use faqkit_shared::{ContentFile, ROOT_CATEGORY};
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

/// File suffix of content documents.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// List every markdown file below `root`, tagged with `content_type`.
///
/// The category of a file is the first directory below `root`; files sitting
/// directly in `root` get [`ROOT_CATEGORY`]. Hidden files and directories are
/// skipped. A missing root is not an error: it yields an empty list and a
/// warning. Results are sorted by path.
#[instrument(skip_all, fields(root = %root.display(), content_type = %content_type))]
pub fn walk(root: &Path, content_type: &str) -> Vec<ContentFile> {
    if !root.is_dir() {
        warn!("content directory not found, skipping type");
        return Vec::new();
    }

    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "failed to read directory entry, skipping");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().to_string();
        if !filename.ends_with(MARKDOWN_EXTENSION) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };

        files.push(ContentFile {
            full_path: entry.path().to_path_buf(),
            filename,
            category: category_of(relative),
            content_type: content_type.to_string(),
        });
    }

    debug!(count = files.len(), "content files discovered");
    files
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// First directory component of a root-relative path.
fn category_of(relative: &Path) -> String {
    let mut components = relative.components();
    let first = components.next();
    match (first, components.next()) {
        (Some(Component::Normal(dir)), Some(_)) => dir.to_string_lossy().to_string(),
        _ => ROOT_CATEGORY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("faqkit-walker-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "---\ntitle: x\n---\n").unwrap();
    }

    #[test]
    fn missing_root_yields_empty() {
        let files = walk(Path::new("/definitely/not/here"), "faq");
        assert!(files.is_empty());
    }

    #[test]
    fn categories_come_from_top_level_directory() {
        let root = temp_dir();
        touch(&root, "scope/is-x-covered.md");
        touch(&root, "scope/nested/deeper.md");
        touch(&root, "obligations/reporting.md");
        touch(&root, "index.md");

        let files = walk(&root, "faq");
        let pairs: Vec<(&str, &str)> = files
            .iter()
            .map(|f| (f.category.as_str(), f.filename.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("root", "index.md"),
                ("obligations", "reporting.md"),
                ("scope", "is-x-covered.md"),
                ("scope", "deeper.md"),
            ]
        );
        assert!(files.iter().all(|f| f.content_type == "faq"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn skips_non_markdown_and_hidden_entries() {
        let root = temp_dir();
        touch(&root, "scope/a.md");
        touch(&root, "scope/notes.txt");
        touch(&root, ".git/HEAD.md");
        touch(&root, "scope/.draft.md");

        let files = walk(&root, "faq");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "a.md");

        let _ = std::fs::remove_dir_all(&root);
    }
}
