//! Markdown → HTML rendering seam.

use pulldown_cmark::{Options, Parser, html};

/// Turns a markdown fragment into escaped HTML.
///
/// The pipeline treats the renderer as a black box; swapping it changes the
/// HTML but not which text ends up in summaries.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer backed by `pulldown-cmark`.
#[derive(Debug, Clone)]
pub struct CmarkRenderer {
    options: Options,
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
        }
    }
}

impl CmarkRenderer {
    /// Renderer with explicit `pulldown-cmark` options.
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, parser);
        tracing::trace!(input = markdown.len(), output = out.len(), "rendered fragment");
        out
    }
}
