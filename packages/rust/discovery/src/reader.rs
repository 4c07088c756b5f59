//! File reading and YAML front-matter splitting.
//!
//! Recognized layout:
//! ```text
//! ---
//! status: "⚠️ Draft"
//! guidance-id: legal-person
//! ---
//!
//! # Question?
//! ```
//! The closing delimiter may also be `...`. A leading BOM and CRLF line
//! endings are tolerated.

use std::path::Path;

use faqkit_shared::{FaqkitError, FrontMatter, RawDocument, Result};
use tracing::{debug, instrument};

const DELIMITER: &str = "---";
const YAML_END: &str = "...";

/// Read a file and split it into front-matter and body.
///
/// Invalid UTF-8 and malformed YAML are errors; a file without any
/// front-matter block is not (it yields an empty mapping).
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_document(path: &Path) -> Result<RawDocument> {
    let bytes = std::fs::read(path).map_err(|e| FaqkitError::io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| {
        FaqkitError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        )
    })?;

    let doc = split_front_matter(&text).map_err(|msg| FaqkitError::front_matter(path, msg))?;
    debug!(
        fields = doc.front_matter.len(),
        body_len = doc.body.len(),
        "document read"
    );
    Ok(doc)
}

/// Split raw text at its front-matter delimiters.
///
/// Returns the YAML error message when the block exists but cannot be parsed
/// into a mapping.
pub fn split_front_matter(text: &str) -> std::result::Result<RawDocument, String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some((first_line, mut rest)) = split_line(text) else {
        return Ok(body_only(text));
    };
    if first_line.trim_end() != DELIMITER {
        return Ok(body_only(text));
    }

    let yaml_start = rest;
    let mut yaml_len = 0;
    let body = loop {
        match split_line(rest) {
            Some((line, after)) => {
                let trimmed = line.trim_end();
                if trimmed == DELIMITER || trimmed == YAML_END {
                    break after;
                }
                yaml_len += rest.len() - after.len();
                rest = after;
            }
            // Unterminated block: treat the whole text as body.
            None => return Ok(body_only(text)),
        }
    };

    let yaml = &yaml_start[..yaml_len];
    let front_matter = parse_yaml(yaml)?;

    Ok(RawDocument {
        front_matter,
        body: body.trim_start_matches(['\r', '\n']).to_string(),
    })
}

fn body_only(text: &str) -> RawDocument {
    RawDocument {
        front_matter: FrontMatter::new(),
        body: text.to_string(),
    }
}

/// Split off one line (without its `\n`). `None` once the input is exhausted.
fn split_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.find('\n') {
        Some(pos) => Some((&text[..pos], &text[pos + 1..])),
        None => Some((text, "")),
    }
}

fn parse_yaml(yaml: &str) -> std::result::Result<FrontMatter, String> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::new());
    }

    match serde_yaml::from_str::<serde_json::Value>(yaml) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(serde_json::Value::Null) => Ok(FrontMatter::new()),
        Ok(other) => Err(format!(
            "front-matter must be a mapping, found {}",
            json_kind(&other)
        )),
        Err(e) => Err(e.to_string()),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a sequence",
        serde_json::Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_front_matter_and_body() {
        let text = "---\nstatus: \"⚠️ Draft\"\nguidance-id: legal-person\n---\n\n# Is X covered?\n\nYes.\n";
        let doc = split_front_matter(text).unwrap();
        assert_eq!(doc.front_matter["status"], json!("⚠️ Draft"));
        assert_eq!(doc.front_matter["guidance-id"], json!("legal-person"));
        assert_eq!(doc.body, "# Is X covered?\n\nYes.\n");
    }

    #[test]
    fn no_front_matter_gives_empty_mapping() {
        let doc = split_front_matter("# Just a heading\n").unwrap();
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, "# Just a heading\n");
    }

    #[test]
    fn empty_block_gives_empty_mapping() {
        let doc = split_front_matter("---\n---\nbody").unwrap();
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn unterminated_block_is_body() {
        let doc = split_front_matter("---\ntitle: x\nno end").unwrap();
        assert!(doc.front_matter.is_empty());
        assert!(doc.body.starts_with("---"));
    }

    #[test]
    fn tolerates_bom_crlf_and_yaml_end_marker() {
        let text = "\u{feff}---\r\norder: 2\r\nfaqs:\r\n  - scope/a\r\n...\r\nBody\r\n";
        let doc = split_front_matter(text).unwrap();
        assert_eq!(doc.front_matter["order"], json!(2));
        assert_eq!(doc.front_matter["faqs"], json!(["scope/a"]));
        assert_eq!(doc.body, "Body\r\n");
    }

    #[test]
    fn non_mapping_front_matter_is_an_error() {
        let err = split_front_matter("---\n- a\n- b\n---\nbody").unwrap_err();
        assert!(err.contains("sequence"));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(split_front_matter("---\ntitle: [unclosed\n---\n").is_err());
    }

    #[test]
    fn read_document_reports_missing_file() {
        let err = read_document(Path::new("/nope/missing.md")).unwrap_err();
        assert!(matches!(err, FaqkitError::Io { .. }));
    }

    #[test]
    fn read_document_rejects_invalid_utf8() {
        let path = std::env::temp_dir().join(format!("faqkit-reader-{}.md", uuid::Uuid::now_v7()));
        std::fs::write(&path, [0x2d, 0x2d, 0x2d, 0x0a, 0xff, 0xfe]).unwrap();
        let err = read_document(&path).unwrap_err();
        assert!(err.to_string().contains("I/O error"));
        let _ = std::fs::remove_file(&path);
    }
}
