//! Base parser: raw documents to generic [`BaseItem`] records.

use faqkit_shared::{BaseItem, RawDocument};
use serde_json::Value;
use tracing::debug;

/// Compute the routable URL of an item.
///
/// Pure: the same `(content_type, category, filename)` always gives the same
/// URL. Nothing downstream of the base parser recomputes it.
pub fn compute_url(content_type: &str, category: &str, filename: &str) -> String {
    let slug = filename.strip_suffix(".md").unwrap_or(filename);
    match content_type {
        "guidance" => format!("/pending-guidance/{slug}/"),
        "lists" | "list" => format!("/lists/{slug}/"),
        _ => format!("/faq/{category}/{slug}/"),
    }
}

/// Turn a split document into a [`BaseItem`].
///
/// Returns `None` when the front-matter is empty: every content item must
/// declare at least one metadata field. Front-matter keys that shadow a
/// base field are dropped.
pub fn parse_base(
    doc: RawDocument,
    filename: &str,
    category: &str,
    content_type: &str,
) -> Option<BaseItem> {
    if doc.front_matter.is_empty() {
        debug!(filename, category, content_type, "no front-matter, skipping");
        return None;
    }

    let mut front_matter = doc.front_matter;
    for key in BaseItem::RESERVED_FIELDS {
        if front_matter.remove(key).is_some() {
            debug!(filename, key, "front-matter key shadows a base field, dropped");
        }
    }

    Some(BaseItem {
        filename: filename.to_string(),
        category: category.to_string(),
        content_type: content_type.to_string(),
        raw_markdown: doc.body,
        url: compute_url(content_type, category, filename),
        front_matter,
    })
}

/// Front-matter keys naming the guidance item a document depends on.
pub const GUIDANCE_REF_KEYS: [&str; 2] = ["guidance-id", "pending-guidance"];

/// A guidance reference as declared in front-matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidanceRef {
    /// Names a guidance item by slug.
    Key(String),
    /// Flags the document as waiting on guidance without naming one.
    Unnamed,
}

impl GuidanceRef {
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Unnamed => None,
        }
    }
}

/// Interpret a `guidance-id` / `pending-guidance` value.
///
/// Strings may be a bare slug, a file name or a path/URL ending in the slug.
/// `false`, `null` and blank strings are not references.
pub fn guidance_ref(value: &Value) -> Option<GuidanceRef> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim().trim_end_matches('/');
            let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
            let key = last.strip_suffix(".md").unwrap_or(last).trim();
            if key.is_empty() {
                None
            } else {
                Some(GuidanceRef::Key(key.to_string()))
            }
        }
        Value::Number(n) => Some(GuidanceRef::Key(n.to_string())),
        Value::Bool(true) => Some(GuidanceRef::Unnamed),
        _ => None,
    }
}

/// Text form of a scalar front-matter value.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqkit_shared::FrontMatter;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)], body: &str) -> RawDocument {
        let mut front_matter = FrontMatter::new();
        for (k, v) in pairs {
            front_matter.insert((*k).to_string(), v.clone());
        }
        RawDocument {
            front_matter,
            body: body.to_string(),
        }
    }

    #[test]
    fn url_routing() {
        assert_eq!(
            compute_url("faq", "scope", "is-x-covered.md"),
            "/faq/scope/is-x-covered/"
        );
        assert_eq!(
            compute_url("guidance", "root", "legal-person.md"),
            "/pending-guidance/legal-person/"
        );
        assert_eq!(compute_url("lists", "root", "top.md"), "/lists/top/");
        assert_eq!(compute_url("list", "any", "top.md"), "/lists/top/");
        assert_eq!(compute_url("notes", "misc", "a.md"), "/faq/misc/a/");
    }

    #[test]
    fn url_is_deterministic() {
        let a = compute_url("faq", "scope", "x.md");
        let b = compute_url("faq", "scope", "x.md");
        assert_eq!(a, b);
    }

    #[test]
    fn empty_front_matter_is_dropped() {
        assert!(parse_base(doc(&[], "# Q"), "a.md", "scope", "faq").is_none());
    }

    #[test]
    fn any_field_passes_the_gate() {
        let item = parse_base(
            doc(&[("Related issue", json!("#12"))], "# Q\n\nA"),
            "a.md",
            "scope",
            "faq",
        )
        .unwrap();
        assert_eq!(item.url, "/faq/scope/a/");
        assert_eq!(item.raw_markdown, "# Q\n\nA");
        assert_eq!(item.front_matter["Related issue"], "#12");
    }

    #[test]
    fn reserved_keys_do_not_shadow_base_fields() {
        let item = parse_base(
            doc(
                &[("url", json!("/elsewhere/")), ("status", json!("Draft"))],
                "",
            ),
            "a.md",
            "scope",
            "faq",
        )
        .unwrap();
        assert_eq!(item.url, "/faq/scope/a/");
        assert!(!item.front_matter.contains_key("url"));
        assert!(item.front_matter.contains_key("status"));
    }

    #[test]
    fn a_document_with_only_reserved_keys_still_parses() {
        let item = parse_base(doc(&[("url", json!("/x/"))], ""), "a.md", "root", "faq");
        assert!(item.is_some());
    }

    #[test]
    fn guidance_ref_forms() {
        assert_eq!(
            guidance_ref(&json!("legal-person")),
            Some(GuidanceRef::Key("legal-person".into()))
        );
        assert_eq!(
            guidance_ref(&json!(" /pending-guidance/legal-person/ ")),
            Some(GuidanceRef::Key("legal-person".into()))
        );
        assert_eq!(
            guidance_ref(&json!("legal-person.md")),
            Some(GuidanceRef::Key("legal-person".into()))
        );
        assert_eq!(guidance_ref(&json!(42)), Some(GuidanceRef::Key("42".into())));
        assert_eq!(guidance_ref(&json!(true)), Some(GuidanceRef::Unnamed));
        assert_eq!(guidance_ref(&json!(false)), None);
        assert_eq!(guidance_ref(&json!("  ")), None);
        assert_eq!(guidance_ref(&Value::Null), None);
    }
}
