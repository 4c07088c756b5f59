//! Content-type registry: which enhancer and post-processor run for each
//! configured type.
//!
//! Built once from [`AppConfig::types`](faqkit_shared::AppConfig) and passed
//! into the pipeline. Lookups return `Option`; there is no dynamic loading.

use faqkit_shared::{AppConfig, BaseItem, ContentKind, Result};

use crate::crossref::{Corpus, PostProcessOutput, post_process_faqs, post_process_lists};
use crate::enhance::{EnhanceContext, enhance_faq, enhance_guidance, enhance_list};
use crate::items::ContentItem;

/// Type-specific field extraction.
pub type EnhanceFn = fn(BaseItem, &EnhanceContext<'_>) -> ContentItem;

/// Cross-type linking over a type's enhanced items.
pub type PostProcessFn = fn(Vec<ContentItem>, &Corpus<'_>) -> PostProcessOutput;

/// Everything the pipeline needs to process one content type.
#[derive(Clone)]
pub struct ContentTypeSpec {
    pub name: String,
    pub kind: ContentKind,
    /// Directory below the content root.
    pub source: String,
    /// Schema name; `None` means items pass validation trivially.
    pub schema: Option<String>,
    /// Front-matter `type` values that move a document into this type.
    pub claims: Vec<String>,
    pub enhance: EnhanceFn,
    pub post_process: Option<PostProcessFn>,
}

impl std::fmt::Debug for ContentTypeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentTypeSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("schema", &self.schema)
            .field("claims", &self.claims)
            .field("post_process", &self.post_process.is_some())
            .finish_non_exhaustive()
    }
}

/// Ordered set of content types.
#[derive(Debug, Clone)]
pub struct Registry {
    types: Vec<ContentTypeSpec>,
}

impl Registry {
    /// Build the registry from configuration, validating it first.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let types = config
            .types
            .iter()
            .map(|ty| {
                let (enhance, post_process) = handlers(ty.kind);
                ContentTypeSpec {
                    name: ty.name.clone(),
                    kind: ty.kind,
                    source: ty.source.clone(),
                    schema: ty.schema.clone(),
                    claims: ty.claims.iter().map(|c| c.trim().to_lowercase()).collect(),
                    enhance,
                    post_process,
                }
            })
            .collect();

        Ok(Self { types })
    }

    pub fn types(&self) -> &[ContentTypeSpec] {
        &self.types
    }

    pub fn get(&self, name: &str) -> Option<&ContentTypeSpec> {
        self.types.iter().find(|ty| ty.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.types.iter().position(|ty| ty.name == name)
    }

    /// Index of the type that claims documents declaring `type: <doc_type>`.
    pub fn claimant(&self, doc_type: &str) -> Option<usize> {
        let doc_type = doc_type.trim().to_lowercase();
        self.types
            .iter()
            .position(|ty| ty.claims.iter().any(|c| *c == doc_type))
    }
}

fn handlers(kind: ContentKind) -> (EnhanceFn, Option<PostProcessFn>) {
    match kind {
        ContentKind::Faq => (enhance_faq, Some(post_process_faqs)),
        ContentKind::Guidance => (enhance_guidance, None),
        ContentKind::List => (enhance_list, Some(post_process_lists)),
    }
}
