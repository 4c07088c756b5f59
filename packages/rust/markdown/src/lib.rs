//! Markdown text extraction for content documents.
//!
//! Pulls the structural pieces the enhancers need out of a document body
//! (first heading, the text after it, named sections), turns slugs into
//! readable labels, and renders short fragments to plain text through a
//! [`MarkdownRenderer`].

mod cleanup;
mod extract;
mod render;

pub use cleanup::{collapse_whitespace, html_to_text};
pub use extract::{HeadingSplit, extract_section, humanize, split_first_heading};
pub use render::{CmarkRenderer, MarkdownRenderer};

/// Render a markdown fragment and strip it down to plain text.
///
/// Newlines inside the fragment are folded into single spaces first, so a
/// multi-line paragraph produces one line of text.
pub fn fragment_to_text(renderer: &dyn MarkdownRenderer, fragment: &str) -> String {
    let joined = fragment
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let joined = collapse_whitespace(&joined);
    if joined.is_empty() {
        return String::new();
    }

    let html = renderer.render(&joined);
    html_to_text(&html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_to_text_strips_markup() {
        let renderer = CmarkRenderer::default();
        let text = fragment_to_text(
            &renderer,
            "Clarify the **SME**\n  definition for [micro](https://example.com) firms.",
        );
        assert_eq!(text, "Clarify the SME definition for micro firms.");
    }

    #[test]
    fn fragment_to_text_decodes_entities() {
        let renderer = CmarkRenderer::default();
        assert_eq!(fragment_to_text(&renderer, "R&D <b>only</b>"), "R&D only");
    }

    #[test]
    fn fragment_to_text_empty() {
        let renderer = CmarkRenderer::default();
        assert_eq!(fragment_to_text(&renderer, "  \n\n "), "");
    }

    #[test]
    fn fragment_to_text_keeps_ascii_punctuation() {
        let renderer = CmarkRenderer::default();
        assert_eq!(
            fragment_to_text(&renderer, r#"Don't treat "SME" -- or micro firms... alike."#),
            r#"Don't treat "SME" -- or micro firms... alike."#
        );
    }
}
