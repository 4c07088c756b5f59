//! Plain-text cleanup passes.
//!
//! Each pass is a function `&str -> String`; [`html_to_text`] chains them to
//! turn rendered HTML back into one normalized line of text.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

/// Strip all markup from an HTML fragment and normalize its whitespace.
pub fn html_to_text(html: &str) -> String {
    let mut result = strip_tags(html);
    result = collapse_whitespace(&result);
    result
}

// ---------------------------------------------------------------------------
// Pass 1: Strip tags
// ---------------------------------------------------------------------------

/// Keep only the text nodes of the fragment; entities come back decoded.
fn strip_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect::<Vec<_>>().join("")
}

// ---------------------------------------------------------------------------
// Pass 2: Collapse whitespace
// ---------------------------------------------------------------------------

/// Replace every whitespace run (including newlines) with one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(text.trim(), " ").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
