//! Enhanced content items.
//!
//! Every enhanced item wraps the [`BaseItem`] it came from (flattened when
//! serialized) and adds the fields of its kind. The serialized shape is what
//! the validator checks and what the renderer receives.

use faqkit_markdown::humanize;
use faqkit_shared::{BaseItem, FaqLink, Status};
use serde::Serialize;

/// Denormalized copy of the guidance item an FAQ depends on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedGuidance {
    pub key: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub status: Option<Status>,
}

/// A question/answer document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    #[serde(flatten)]
    pub base: BaseItem,
    pub question: Option<String>,
    /// Omitted entirely (not empty) when the document has no answer text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_guidance: Option<RelatedGuidance>,
}

impl FaqItem {
    /// Names of the fields this type adds on top of [`BaseItem`].
    pub const FIELDS: [&'static str; 5] =
        ["question", "answer", "status", "guidanceId", "relatedGuidance"];

    /// Question text, falling back to the humanized file name.
    pub fn display_question(&self) -> String {
        self.question
            .clone()
            .unwrap_or_else(|| humanize(self.base.slug()))
    }

    /// Link used by guidance and list items.
    pub fn link(&self) -> FaqLink {
        FaqLink {
            question: self.display_question(),
            url: self.base.url.clone(),
        }
    }
}

/// A request for official guidance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceItem {
    #[serde(flatten)]
    pub base: BaseItem,
    pub title: String,
    /// Plain text of the "Guidance Needed" section; empty when absent.
    pub summary: String,
    pub status: Option<Status>,
    pub related_faqs: Vec<FaqLink>,
}

impl GuidanceItem {
    pub const FIELDS: [&'static str; 4] = ["title", "summary", "status", "relatedFaqs"];
}

/// A curated, ordered list of FAQs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    #[serde(flatten)]
    pub base: BaseItem,
    pub title: String,
    pub description: String,
    pub order: i64,
    /// Declared `"category/slug"` references, as written by the author.
    pub faqs: Vec<String>,
    /// References that resolved to an FAQ, in declared order.
    pub items: Vec<FaqLink>,
}

impl ListItem {
    pub const FIELDS: [&'static str; 5] = ["title", "description", "order", "faqs", "items"];

    /// Sort position used when no `order` is declared.
    pub const DEFAULT_ORDER: i64 = 999;
}

/// Any enhanced item, as stored in the per-type collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentItem {
    Faq(FaqItem),
    Guidance(GuidanceItem),
    List(ListItem),
}

impl ContentItem {
    pub fn base(&self) -> &BaseItem {
        match self {
            Self::Faq(item) => &item.base,
            Self::Guidance(item) => &item.base,
            Self::List(item) => &item.base,
        }
    }

    /// Lookup key in the assembled structure: `category/slug` for FAQs,
    /// the bare slug for guidance and lists.
    pub fn key(&self) -> String {
        match self {
            Self::Faq(item) => faq_key(&item.base.category, item.base.slug()),
            Self::Guidance(item) => item.base.slug().to_string(),
            Self::List(item) => item.base.slug().to_string(),
        }
    }

    pub fn as_faq(&self) -> Option<&FaqItem> {
        match self {
            Self::Faq(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_guidance(&self) -> Option<&GuidanceItem> {
        match self {
            Self::Guidance(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListItem> {
        match self {
            Self::List(item) => Some(item),
            _ => None,
        }
    }
}

/// Flat FAQ index key.
pub fn faq_key(category: &str, slug: &str) -> String {
    format!("{category}/{slug}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqkit_shared::FrontMatter;

    fn base() -> BaseItem {
        BaseItem {
            filename: "is-x-covered.md".into(),
            category: "scope".into(),
            content_type: "faq".into(),
            raw_markdown: "# Is X covered?".into(),
            url: "/faq/scope/is-x-covered/".into(),
            front_matter: FrontMatter::new(),
        }
    }

    #[test]
    fn missing_answer_is_not_serialized() {
        let item = FaqItem {
            base: base(),
            question: Some("Is X covered?".into()),
            answer: None,
            status: None,
            guidance_id: None,
            related_guidance: None,
        };
        let value = serde_json::to_value(&item).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("answer"));
        assert!(obj.contains_key("status"));
        assert!(obj["status"].is_null());
        assert_eq!(obj["url"], "/faq/scope/is-x-covered/");
    }

    #[test]
    fn keys_by_kind() {
        let faq = ContentItem::Faq(FaqItem {
            base: base(),
            question: None,
            answer: None,
            status: None,
            guidance_id: None,
            related_guidance: None,
        });
        assert_eq!(faq.key(), "scope/is-x-covered");

        let mut b = base();
        b.filename = "legal-person.md".into();
        let guidance = ContentItem::Guidance(GuidanceItem {
            base: b,
            title: "Legal person".into(),
            summary: String::new(),
            status: None,
            related_faqs: vec![],
        });
        assert_eq!(guidance.key(), "legal-person");
    }

    #[test]
    fn display_question_falls_back_to_filename() {
        let item = FaqItem {
            base: base(),
            question: None,
            answer: None,
            status: None,
            guidance_id: None,
            related_guidance: None,
        };
        assert_eq!(item.display_question(), "Is X Covered");
    }
}
