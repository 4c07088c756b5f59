//! Post-processors: cross-type linking after every type is enhanced.
//!
//! A post-processor only ever returns new copies of its own items. Changes
//! it wants applied to another type's collection travel as [`Patch`]es and
//! are merged by the assembler once every post-processor has run.

use std::cmp::Ordering;
use std::collections::HashMap;

use faqkit_shared::FaqLink;
use tracing::debug;

use crate::items::{ContentItem, FaqItem, GuidanceItem, RelatedGuidance, faq_key};

/// A change to another type's collection, applied by the assembler.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Replace `relatedFaqs` of the guidance item with this slug.
    RelatedFaqs {
        guidance_key: String,
        faqs: Vec<FaqLink>,
    },
}

/// Result of one post-processor run.
#[derive(Debug, Clone, Default)]
pub struct PostProcessOutput {
    pub items: Vec<ContentItem>,
    pub patches: Vec<Patch>,
}

/// Read-only view over every enhanced collection as `(type name, items)`,
/// in registry order.
///
/// Iteration follows the same order the assembler inserts items in, so a
/// first-wins index built here picks the item that ends up in the output.
pub struct Corpus<'a> {
    collections: &'a [(String, Vec<ContentItem>)],
}

impl<'a> Corpus<'a> {
    pub fn new(collections: &'a [(String, Vec<ContentItem>)]) -> Self {
        Self { collections }
    }

    fn all(&self) -> impl Iterator<Item = &'a ContentItem> {
        self.collections.iter().flat_map(|(_, items)| items)
    }

    /// Every FAQ item, whatever type it was registered under.
    pub fn faqs(&self) -> impl Iterator<Item = &'a FaqItem> {
        self.all().filter_map(ContentItem::as_faq)
    }

    /// Every guidance item, whatever type it was registered under.
    pub fn guidance(&self) -> impl Iterator<Item = &'a GuidanceItem> {
        self.all().filter_map(ContentItem::as_guidance)
    }
}

// ---------------------------------------------------------------------------
// FAQ <-> Guidance
// ---------------------------------------------------------------------------

/// Attach `relatedGuidance` to FAQs and emit the reverse links for every
/// guidance item.
///
/// Only the FAQs of `items` contribute to the emitted `relatedFaqs`, so two
/// FAQ types never overwrite each other's links: the assembler merges the
/// patches for one guidance key.
pub fn post_process_faqs(items: Vec<ContentItem>, corpus: &Corpus<'_>) -> PostProcessOutput {
    let mut guidance: HashMap<&str, &GuidanceItem> = HashMap::new();
    for item in corpus.guidance() {
        guidance.entry(item.base.slug()).or_insert(item);
    }

    let items: Vec<ContentItem> = items
        .into_iter()
        .map(|item| match item {
            ContentItem::Faq(mut faq) => {
                faq.related_guidance = faq
                    .guidance_id
                    .as_deref()
                    .and_then(|key| guidance.get(key))
                    .map(|g| RelatedGuidance {
                        key: g.base.slug().to_string(),
                        title: g.title.clone(),
                        summary: g.summary.clone(),
                        url: g.base.url.clone(),
                        status: g.status,
                    });
                ContentItem::Faq(faq)
            }
            other => other,
        })
        .collect();

    let mut patches = Vec::new();
    for key in guidance.keys() {
        let mut faqs: Vec<&FaqItem> = items
            .iter()
            .filter_map(ContentItem::as_faq)
            .filter(|faq| faq.guidance_id.as_deref() == Some(*key))
            .collect();
        faqs.sort_by(|a, b| compare_questions(a, b));

        patches.push(Patch::RelatedFaqs {
            guidance_key: (*key).to_string(),
            faqs: faqs.into_iter().map(FaqItem::link).collect(),
        });
    }
    patches.sort_by(|a, b| patch_key(a).cmp(patch_key(b)));

    debug!(patches = patches.len(), "faq cross-references computed");
    PostProcessOutput { items, patches }
}

fn patch_key(patch: &Patch) -> &str {
    match patch {
        Patch::RelatedFaqs { guidance_key, .. } => guidance_key,
    }
}

/// Question order for display: case and accents ignored, URL breaks ties.
pub fn compare_questions(a: &FaqItem, b: &FaqItem) -> Ordering {
    compare_links(&a.link(), &b.link())
}

pub(crate) fn compare_links(a: &FaqLink, b: &FaqLink) -> Ordering {
    collation_key(&a.question)
        .cmp(&collation_key(&b.question))
        .then_with(|| a.url.cmp(&b.url))
}

fn collation_key(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect()
}

/// Base letter of common Latin accented characters.
fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => 'i',
        'ł' | 'ľ' | 'ĺ' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' | 'ţ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

// ---------------------------------------------------------------------------
// List -> FAQ
// ---------------------------------------------------------------------------

/// Resolve every list's `faqs` references into `items`, keeping the
/// declared order. References to unknown FAQs are dropped.
pub fn post_process_lists(items: Vec<ContentItem>, corpus: &Corpus<'_>) -> PostProcessOutput {
    let mut index: HashMap<String, &FaqItem> = HashMap::new();
    for faq in corpus.faqs() {
        index
            .entry(faq_key(&faq.base.category, faq.base.slug()))
            .or_insert(faq);
    }

    let items = items
        .into_iter()
        .map(|item| match item {
            ContentItem::List(mut list) => {
                list.items = list
                    .faqs
                    .iter()
                    .filter_map(|reference| index.get(normalize_ref(reference).as_str()))
                    .map(|faq| faq.link())
                    .collect();
                if list.items.len() < list.faqs.len() {
                    debug!(
                        list = %list.base.slug(),
                        declared = list.faqs.len(),
                        resolved = list.items.len(),
                        "unresolved list references skipped"
                    );
                }
                ContentItem::List(list)
            }
            other => other,
        })
        .collect();

    PostProcessOutput {
        items,
        patches: Vec::new(),
    }
}

/// `"/scope/a.md"` and `"scope/a"` name the same FAQ.
fn normalize_ref(reference: &str) -> String {
    let trimmed = reference.trim().trim_matches('/');
    trimmed.strip_suffix(".md").unwrap_or(trimmed).to_string()
}
