//! Structural extraction from markdown bodies.
//!
//! Only ATX headings (`# Title`) are recognized. Lines inside fenced code
//! blocks never count as headings.

use std::sync::LazyLock;

use regex::Regex;

/// Matches any ATX heading: level in group 1, text in group 2.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*$").expect("heading regex")
});

/// A body split at its first top-level heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingSplit {
    /// Text of the first `# ` heading, if any.
    pub heading: Option<String>,
    /// Everything after that heading, trimmed. The whole body when there is
    /// no heading.
    pub rest: String,
}

/// Split `body` at its first level-1 heading.
pub fn split_first_heading(body: &str) -> HeadingSplit {
    let mut offset = 0;
    let mut fence = FenceTracker::default();

    for line in body.split_inclusive('\n') {
        let line_end = offset + line.len();
        let content = line.trim_end_matches(['\r', '\n']);

        if !fence.is_code(content) {
            if let Some((1, text)) = parse_heading(content) {
                return HeadingSplit {
                    heading: Some(text),
                    rest: body[line_end..].trim().to_string(),
                };
            }
        }

        offset = line_end;
    }

    HeadingSplit {
        heading: None,
        rest: body.trim().to_string(),
    }
}

/// Lines between the heading named `name` (any level, case-insensitive,
/// optional trailing colon) and the next heading of any level.
///
/// `None` when no such heading exists; `Some("")` for an empty section.
pub fn extract_section(body: &str, name: &str) -> Option<String> {
    let mut fence = FenceTracker::default();
    let mut collected: Option<Vec<&str>> = None;

    for line in body.lines() {
        let heading = if fence.is_code(line) {
            None
        } else {
            parse_heading(line)
        };

        if let Some(lines) = collected.as_mut() {
            if heading.is_some() {
                break;
            }
            lines.push(line);
        } else if let Some((_, text)) = heading {
            let text = text.trim_end_matches(':').trim();
            if text.eq_ignore_ascii_case(name) {
                collected = Some(Vec::new());
            }
        }
    }

    collected.map(|lines| lines.join("\n").trim().to_string())
}

/// Turn a slug into a display label: separators become spaces, words are
/// capitalized, and the token `cra` is always written `CRA`.
pub fn humanize(slug: &str) -> String {
    let slug = slug.strip_suffix(".md").unwrap_or(slug);
    slug.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            if word.eq_ignore_ascii_case("cra") {
                "CRA".to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_heading(line: &str) -> Option<(usize, String)> {
    HEADING_RE
        .captures(line)
        .map(|caps| (caps[1].len(), caps[2].trim().to_string()))
}

/// Tracks whether the current line sits inside a ``` or ~~~ fence.
#[derive(Default)]
struct FenceTracker {
    open: Option<&'static str>,
}

impl FenceTracker {
    /// Feed one line; returns true when it belongs to a code block
    /// (fence lines included).
    fn is_code(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some("```")
        } else if trimmed.starts_with("~~~") {
            Some("~~~")
        } else {
            None
        };

        match (self.open, marker) {
            (Some(open), Some(m)) if open == m => {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, Some(m)) => {
                self.open = Some(m);
                true
            }
            (None, None) => false,
        }
    }
}
