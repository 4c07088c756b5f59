//! Shared types, error model, and configuration for faqkit.
//!
//! This crate is the foundation depended on by all other faqkit crates.
//! It provides:
//! - [`FaqkitError`]: the unified error type
//! - Domain types ([`ContentFile`], [`RawDocument`], [`BaseItem`], [`Status`], [`BuildId`])
//! - Configuration ([`AppConfig`], [`ContentTypeConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ContentKind, ContentTypeConfig, PathsConfig, SchemasConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, resolve_config,
};
pub use error::{FaqkitError, Result};
pub use types::{
    BaseItem, BuildId, ContentFile, FaqLink, FrontMatter, ROOT_CATEGORY, RawDocument, Status,
    ValidationIssue,
};
