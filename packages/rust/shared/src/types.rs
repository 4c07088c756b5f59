//! Core domain types for the faqkit content pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category assigned to files that sit directly inside a content type's root.
pub const ROOT_CATEGORY: &str = "root";

/// Parsed front-matter block: an ordered-by-key JSON mapping.
pub type FrontMatter = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// BuildId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one pipeline run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(pub Uuid);

impl BuildId {
    /// Generate a new time-sortable build identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BuildId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Discovery / reading
// ---------------------------------------------------------------------------

/// A markdown file found under a content type's root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    /// Absolute (or root-joined) path to the file.
    pub full_path: PathBuf,
    /// File name including the `.md` extension.
    pub filename: String,
    /// First directory below the type root, or [`ROOT_CATEGORY`].
    pub category: String,
    /// Name of the content type this file was discovered for.
    pub content_type: String,
}

/// A document split into its front-matter mapping and body text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument {
    pub front_matter: FrontMatter,
    pub body: String,
}

// ---------------------------------------------------------------------------
// BaseItem
// ---------------------------------------------------------------------------

/// Minimal generic record produced by the base parser.
///
/// Front-matter fields are flattened next to the fixed fields when
/// serialized. `url` is computed exactly once and never rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseItem {
    pub filename: String,
    pub category: String,
    pub content_type: String,
    pub raw_markdown: String,
    pub url: String,
    #[serde(flatten)]
    pub front_matter: FrontMatter,
}

impl BaseItem {
    /// Field names owned by the base record; front-matter may not shadow them.
    pub const RESERVED_FIELDS: [&'static str; 5] =
        ["filename", "category", "contentType", "rawMarkdown", "url"];

    /// File name without its `.md` extension.
    pub fn slug(&self) -> &str {
        self.filename.strip_suffix(".md").unwrap_or(&self.filename)
    }

    /// Remove and return a front-matter value, trying each key in order.
    pub fn take_field(&mut self, keys: &[&str]) -> Option<serde_json::Value> {
        let mut found = None;
        for key in keys {
            if let Some(value) = self.front_matter.remove(*key) {
                if found.is_none() {
                    found = Some(value);
                }
            }
        }
        found
    }
}

/// A `{question, url}` pointer to an FAQ, used by guidance and list items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqLink {
    pub question: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// One schema violation: where it happened, what is wrong, the offending value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// JSON-pointer-like path of the field (`/faqs/2`), `/` for the item itself.
    pub path: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Normalized editorial status of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Draft,
    PendingGuidance,
    Approved,
}

impl Status {
    /// Canonical text form, as emitted in the output structure.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingGuidance => "pending-guidance",
            Self::Approved => "approved",
        }
    }

    /// Normalize free-form declared status text such as `"⚠️ Draft"`.
    ///
    /// Leading emoji, punctuation and whitespace are ignored, matching is
    /// case-insensitive, and `-`/`_` count as spaces.
    pub fn from_declared(text: &str) -> Self {
        let stripped = text.trim_start_matches(|c: char| !c.is_alphanumeric());
        let lowered = stripped.to_lowercase().replace(['-', '_'], " ");
        let normalized = lowered.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.contains("draft") {
            Self::Draft
        } else if normalized.contains("pending guidance") {
            Self::PendingGuidance
        } else {
            Self::Approved
        }
    }

    /// Derive the status of an item.
    ///
    /// A guidance reference always wins. Without a declared status (and no
    /// reference) the status is absent rather than defaulted.
    pub fn derive(declared: Option<&str>, has_guidance_ref: bool) -> Option<Self> {
        if has_guidance_ref {
            return Some(Self::PendingGuidance);
        }
        declared.map(Self::from_declared)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(filename: &str) -> BaseItem {
        BaseItem {
            filename: filename.into(),
            category: "scope".into(),
            content_type: "faq".into(),
            raw_markdown: String::new(),
            url: "/faq/scope/x/".into(),
            front_matter: FrontMatter::new(),
        }
    }

    #[test]
    fn status_from_emoji_prefixed_text() {
        assert_eq!(Status::from_declared("⚠️ Draft"), Status::Draft);
        assert_eq!(Status::from_declared("🚧 Pending Guidance"), Status::PendingGuidance);
        assert_eq!(Status::from_declared("✅ Approved"), Status::Approved);
        assert_eq!(Status::from_declared("Reviewed"), Status::Approved);
    }

    #[test]
    fn status_normalization_is_idempotent() {
        for text in ["⚠️ Draft", "pending guidance", "PENDING_GUIDANCE", "final", ""] {
            let once = Status::from_declared(text);
            let twice = Status::from_declared(once.as_str());
            assert_eq!(once, twice, "not idempotent for {text:?}");
        }
    }

    #[test]
    fn guidance_reference_overrides_declared_status() {
        assert_eq!(
            Status::derive(Some("Approved"), true),
            Some(Status::PendingGuidance)
        );
        assert_eq!(Status::derive(None, true), Some(Status::PendingGuidance));
    }

    #[test]
    fn missing_status_stays_absent() {
        assert_eq!(Status::derive(None, false), None);
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&Status::PendingGuidance).unwrap();
        assert_eq!(json, "\"pending-guidance\"");
    }

    #[test]
    fn base_item_slug_and_flattening() {
        let mut item = base("is-x-covered.md");
        item.front_matter
            .insert("Related issue".into(), serde_json::json!("#42"));
        assert_eq!(item.slug(), "is-x-covered");

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["Related issue"], "#42");
        assert_eq!(value["contentType"], "faq");
        assert_eq!(value["rawMarkdown"], "");
    }

    #[test]
    fn take_field_removes_all_aliases() {
        let mut item = base("a.md");
        item.front_matter.insert("status".into(), serde_json::json!("Draft"));
        item.front_matter.insert("Status".into(), serde_json::json!("Approved"));

        let taken = item.take_field(&["status", "Status"]);
        assert_eq!(taken, Some(serde_json::json!("Draft")));
        assert!(item.front_matter.is_empty());
    }
}
