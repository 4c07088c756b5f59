//! Type enhancers: per-kind field extraction layered onto a [`BaseItem`].
//!
//! Every enhancer is a plain function selected through the
//! [`Registry`](crate::registry::Registry). They share one extraction rule:
//! the first `# ` heading of the body is the title, everything after it is
//! the body text.

use faqkit_markdown::{
    MarkdownRenderer, extract_section, fragment_to_text, humanize, split_first_heading,
};
use faqkit_shared::{BaseItem, Status};
use serde_json::Value;

use crate::items::{ContentItem, FaqItem, GuidanceItem, ListItem};
use crate::parser::{GUIDANCE_REF_KEYS, guidance_ref, scalar_text};

/// Heading of the guidance section summarized into `summary`.
pub const GUIDANCE_SECTION: &str = "Guidance Needed";

const STATUS_KEYS: [&str; 2] = ["status", "Status"];

/// Collaborators available to enhancers.
pub struct EnhanceContext<'a> {
    pub renderer: &'a dyn MarkdownRenderer,
}

// ---------------------------------------------------------------------------
// FAQ
// ---------------------------------------------------------------------------

/// Question from the first heading, answer from the text after it.
pub fn enhance_faq(mut base: BaseItem, _ctx: &EnhanceContext<'_>) -> ContentItem {
    let split = split_first_heading(&base.raw_markdown);

    let declared = take_text(&mut base, &STATUS_KEYS);
    let reference = base
        .take_field(&GUIDANCE_REF_KEYS)
        .and_then(|value| guidance_ref(&value));
    strip_fields(&mut base, &FaqItem::FIELDS);

    let status = Status::derive(declared.as_deref(), reference.is_some());
    let guidance_id = reference.and_then(|r| r.key().map(str::to_string));

    ContentItem::Faq(FaqItem {
        base,
        question: split.heading,
        answer: Some(split.rest).filter(|answer| !answer.is_empty()),
        status,
        guidance_id,
        related_guidance: None,
    })
}

// ---------------------------------------------------------------------------
// Guidance
// ---------------------------------------------------------------------------

/// Title with fallbacks and a plain-text summary of the guidance section.
pub fn enhance_guidance(mut base: BaseItem, ctx: &EnhanceContext<'_>) -> ContentItem {
    let split = split_first_heading(&base.raw_markdown);

    let declared = take_text(&mut base, &STATUS_KEYS);
    let front_title = take_text(&mut base, &["title"]);
    strip_fields(&mut base, &GuidanceItem::FIELDS);

    let title = split
        .heading
        .or(front_title)
        .unwrap_or_else(|| humanize(base.slug()));

    let summary = extract_section(&base.raw_markdown, GUIDANCE_SECTION)
        .map(|section| fragment_to_text(ctx.renderer, &section))
        .unwrap_or_default();

    ContentItem::Guidance(GuidanceItem {
        title,
        summary,
        status: Status::derive(declared.as_deref(), false),
        related_faqs: Vec::new(),
        base,
    })
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// Title, description, display order and the declared FAQ references.
pub fn enhance_list(mut base: BaseItem, _ctx: &EnhanceContext<'_>) -> ContentItem {
    let split = split_first_heading(&base.raw_markdown);

    let front_title = take_text(&mut base, &["title"]);
    let order = base
        .take_field(&["order"])
        .and_then(|value| parse_order(&value))
        .unwrap_or(ListItem::DEFAULT_ORDER);
    let faqs = base
        .take_field(&["faqs"])
        .map(|value| parse_refs(&value))
        .unwrap_or_default();
    strip_fields(&mut base, &ListItem::FIELDS);

    let title = split
        .heading
        .or(front_title)
        .unwrap_or_else(|| humanize(base.slug()));

    ContentItem::List(ListItem {
        title,
        description: split.rest,
        order,
        faqs,
        items: Vec::new(),
        base,
    })
}

fn parse_order(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A sequence of references; a lone string counts as a one-element list.
fn parse_refs(value: &Value) -> Vec<String> {
    match value {
        Value::Array(values) => values.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn take_text(base: &mut BaseItem, keys: &[&str]) -> Option<String> {
    base.take_field(keys).and_then(|value| scalar_text(&value))
}

/// Drop front-matter keys that would serialize on top of typed fields.
fn strip_fields(base: &mut BaseItem, fields: &[&str]) {
    for field in fields {
        base.front_matter.remove(*field);
    }
}
