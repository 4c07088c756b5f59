//! Content discovery: directory walking and front-matter splitting.
//!
//! Every content type has its own root directory. The walker lists the
//! markdown files below it, the reader turns one file into a
//! [`RawDocument`](faqkit_shared::RawDocument). Both are synchronous and
//! failures are per-file: the caller decides whether to skip or abort.

mod reader;
mod walker;

pub use reader::{read_document, split_front_matter};
pub use walker::{MARKDOWN_EXTENSION, walk};
