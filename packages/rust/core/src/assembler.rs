//! Site-data assembler.
//!
//! Takes the validated items of every type, applies the cross-reference
//! patches emitted by post-processors, and builds the keyed structure the
//! renderer consumes:
//!
//! ```text
//! SiteData
//! ├── faqs            "category/slug" -> FaqItem
//! ├── guidance        slug -> GuidanceItem
//! ├── lists           slug -> ListItem
//! ├── listOrder       list slugs by (order, discovery position)
//! ├── categories      type -> category -> {label, keys}
//! ├── crossReferences faqToGuidance / guidanceToFaqs / listToFaqs
//! └── stats           build id, timestamp, schema version, per-type counts
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use faqkit_markdown::humanize;
use faqkit_shared::{BuildId, FaqLink};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::crossref::{Patch, compare_links};
use crate::items::{ContentItem, FaqItem, GuidanceItem, ListItem};

/// Per-type counters for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStats {
    /// Markdown files found under the type's root.
    pub discovered: usize,
    /// Files that could not be read or split.
    pub read_errors: usize,
    /// Documents that produced a base item (after `type` rerouting).
    pub parsed: usize,
    pub valid: usize,
    pub invalid: usize,
}

/// Statistics block of the assembled structure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    pub build_id: BuildId,
    pub processed_at: DateTime<Utc>,
    pub schema_version: Option<String>,
    pub types: BTreeMap<String, TypeStats>,
}

/// One entry of the category index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    /// Human-readable category name.
    pub label: String,
    /// Item keys in discovery order.
    pub keys: Vec<String>,
}

/// Side table of resolved cross-references, by item key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReferences {
    pub faq_to_guidance: BTreeMap<String, String>,
    pub guidance_to_faqs: BTreeMap<String, Vec<String>>,
    pub list_to_faqs: BTreeMap<String, Vec<String>>,
}

/// The consolidated structure handed to the renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteData {
    pub faqs: BTreeMap<String, FaqItem>,
    pub guidance: BTreeMap<String, GuidanceItem>,
    pub lists: BTreeMap<String, ListItem>,
    pub list_order: Vec<String>,
    pub categories: BTreeMap<String, BTreeMap<String, CategoryEntry>>,
    pub cross_references: CrossReferences,
    pub stats: BuildStats,
}

impl SiteData {
    /// Lists in display order.
    pub fn ordered_lists(&self) -> impl Iterator<Item = &ListItem> {
        self.list_order.iter().filter_map(|key| self.lists.get(key))
    }

    pub fn item_count(&self) -> usize {
        self.faqs.len() + self.guidance.len() + self.lists.len()
    }
}

/// Valid items of one content type, in discovery order.
#[derive(Debug, Clone)]
pub struct TypeBatch {
    pub name: String,
    pub items: Vec<ContentItem>,
}

/// Everything the assembler needs.
#[derive(Debug, Clone)]
pub struct AssembleInput {
    pub batches: Vec<TypeBatch>,
    pub patches: Vec<Patch>,
    pub stats: BuildStats,
}

/// Assemble the final structure.
///
/// Patches are applied first, then every link pointing at an item that is
/// not part of the output (failed validation or never existed) is pruned.
#[instrument(skip_all, fields(types = input.batches.len(), patches = input.patches.len()))]
pub fn assemble(input: AssembleInput) -> SiteData {
    let AssembleInput {
        batches,
        patches,
        stats,
    } = input;

    let mut site = SiteData {
        faqs: BTreeMap::new(),
        guidance: BTreeMap::new(),
        lists: BTreeMap::new(),
        list_order: Vec::new(),
        categories: BTreeMap::new(),
        cross_references: CrossReferences::default(),
        stats,
    };

    // list key, order, discovery position
    let mut list_positions: Vec<(String, i64, usize)> = Vec::new();

    for batch in batches {
        let categories = site.categories.entry(batch.name.clone()).or_default();

        for item in batch.items {
            let key = item.key();
            let category = item.base().category.clone();

            let inserted = match item {
                ContentItem::Faq(faq) => insert_unique(&mut site.faqs, &key, faq, &batch.name),
                ContentItem::Guidance(g) => insert_unique(&mut site.guidance, &key, g, &batch.name),
                ContentItem::List(list) => {
                    let order = list.order;
                    let added = insert_unique(&mut site.lists, &key, list, &batch.name);
                    if added {
                        list_positions.push((key.clone(), order, list_positions.len()));
                    }
                    added
                }
            };

            if inserted {
                categories
                    .entry(category.clone())
                    .or_insert_with(|| CategoryEntry {
                        label: humanize(&category),
                        keys: Vec::new(),
                    })
                    .keys
                    .push(key);
            }
        }
    }

    list_positions.sort_by(|a, b| a.1.cmp(&b.1).then(a.2.cmp(&b.2)));
    site.list_order = list_positions.into_iter().map(|(key, _, _)| key).collect();

    apply_patches(&mut site.guidance, patches);
    prune_dangling_links(&mut site);
    site.cross_references = build_cross_references(&site);

    info!(
        faqs = site.faqs.len(),
        guidance = site.guidance.len(),
        lists = site.lists.len(),
        "site data assembled"
    );
    site
}

fn insert_unique<T>(map: &mut BTreeMap<String, T>, key: &str, item: T, type_name: &str) -> bool {
    if map.contains_key(key) {
        warn!(key, content_type = type_name, "duplicate item key, keeping the first");
        return false;
    }
    map.insert(key.to_string(), item);
    true
}

/// Merge patches per guidance key and write them onto the guidance items.
fn apply_patches(guidance: &mut BTreeMap<String, GuidanceItem>, patches: Vec<Patch>) {
    let mut merged: BTreeMap<String, Vec<FaqLink>> = BTreeMap::new();
    for patch in patches {
        match patch {
            Patch::RelatedFaqs { guidance_key, faqs } => {
                merged.entry(guidance_key).or_default().extend(faqs);
            }
        }
    }

    for (key, mut faqs) in merged {
        let Some(item) = guidance.get_mut(&key) else {
            debug!(key, "patch for guidance not in output, skipped");
            continue;
        };
        faqs.sort_by(compare_links);
        faqs.dedup_by(|a, b| a.url == b.url);
        item.related_faqs = faqs;
    }
}

/// Drop links whose target is not part of the assembled output.
fn prune_dangling_links(site: &mut SiteData) {
    let faq_urls: HashSet<String> = site.faqs.values().map(|f| f.base.url.clone()).collect();
    let guidance_urls: HashSet<String> =
        site.guidance.values().map(|g| g.base.url.clone()).collect();

    let mut pruned = 0usize;
    for faq in site.faqs.values_mut() {
        if faq
            .related_guidance
            .as_ref()
            .is_some_and(|g| !guidance_urls.contains(&g.url))
        {
            faq.related_guidance = None;
            pruned += 1;
        }
    }
    for guidance in site.guidance.values_mut() {
        let before = guidance.related_faqs.len();
        guidance.related_faqs.retain(|link| faq_urls.contains(&link.url));
        pruned += before - guidance.related_faqs.len();
    }
    for list in site.lists.values_mut() {
        let before = list.items.len();
        list.items.retain(|link| faq_urls.contains(&link.url));
        pruned += before - list.items.len();
    }

    if pruned > 0 {
        debug!(pruned, "links to excluded items removed");
    }
}

fn build_cross_references(site: &SiteData) -> CrossReferences {
    let faq_by_url: HashMap<&str, &str> = site
        .faqs
        .iter()
        .map(|(key, faq)| (faq.base.url.as_str(), key.as_str()))
        .collect();
    let keys_of = |links: &[FaqLink]| -> Vec<String> {
        links
            .iter()
            .filter_map(|link| faq_by_url.get(link.url.as_str()))
            .map(|key| (*key).to_string())
            .collect()
    };

    CrossReferences {
        faq_to_guidance: site
            .faqs
            .iter()
            .filter_map(|(key, faq)| {
                faq.related_guidance
                    .as_ref()
                    .map(|g| (key.clone(), g.key.clone()))
            })
            .collect(),
        guidance_to_faqs: site
            .guidance
            .iter()
            .map(|(key, g)| (key.clone(), keys_of(&g.related_faqs)))
            .collect(),
        list_to_faqs: site
            .lists
            .iter()
            .map(|(key, list)| (key.clone(), keys_of(&list.items)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::RelatedGuidance;
    use crate::parser::compute_url;
    use faqkit_shared::{BaseItem, FrontMatter, Status};

    fn base(content_type: &str, category: &str, filename: &str) -> BaseItem {
        BaseItem {
            filename: filename.into(),
            category: category.into(),
            content_type: content_type.into(),
            raw_markdown: String::new(),
            url: compute_url(content_type, category, filename),
            front_matter: FrontMatter::new(),
        }
    }

    fn faq(category: &str, filename: &str, guidance: Option<&str>) -> ContentItem {
        let b = base("faq", category, filename);
        ContentItem::Faq(FaqItem {
            question: Some(format!("{}?", b.slug())),
            answer: Some("Yes.".into()),
            status: guidance.map(|_| Status::PendingGuidance),
            guidance_id: guidance.map(str::to_string),
            related_guidance: guidance.map(|key| RelatedGuidance {
                key: key.into(),
                title: "T".into(),
                summary: "S".into(),
                url: compute_url("guidance", "root", &format!("{key}.md")),
                status: None,
            }),
            base: b,
        })
    }

    fn guidance(filename: &str) -> ContentItem {
        ContentItem::Guidance(GuidanceItem {
            base: base("guidance", "root", filename),
            title: "T".into(),
            summary: "S".into(),
            status: None,
            related_faqs: Vec::new(),
        })
    }

    fn list(filename: &str, order: i64, items: Vec<FaqLink>) -> ContentItem {
        ContentItem::List(ListItem {
            base: base("lists", "root", filename),
            title: filename.into(),
            description: String::new(),
            order,
            faqs: Vec::new(),
            items,
        })
    }

    fn link(category: &str, slug: &str) -> FaqLink {
        FaqLink {
            question: format!("{slug}?"),
            url: compute_url("faq", category, &format!("{slug}.md")),
        }
    }

    fn stats() -> BuildStats {
        BuildStats {
            build_id: BuildId::new(),
            processed_at: Utc::now(),
            schema_version: Some("abc".into()),
            types: BTreeMap::new(),
        }
    }

    fn batch(name: &str, items: Vec<ContentItem>) -> TypeBatch {
        TypeBatch {
            name: name.into(),
            items,
        }
    }

    #[test]
    fn keyed_collections_and_category_index() {
        let site = assemble(AssembleInput {
            batches: vec![
                batch(
                    "faq",
                    vec![
                        faq("cra-scope", "a.md", None),
                        faq("cra-scope", "b.md", None),
                        faq("fees", "c.md", None),
                    ],
                ),
                batch("guidance", vec![guidance("legal-person.md")]),
            ],
            patches: vec![],
            stats: stats(),
        });

        assert!(site.faqs.contains_key("cra-scope/a"));
        assert!(site.guidance.contains_key("legal-person"));
        let scope = &site.categories["faq"]["cra-scope"];
        assert_eq!(scope.label, "CRA Scope");
        assert_eq!(scope.keys, vec!["cra-scope/a", "cra-scope/b"]);
        assert_eq!(site.categories["guidance"]["root"].keys, vec!["legal-person"]);
        assert_eq!(site.item_count(), 4);
    }

    #[test]
    fn patches_fill_related_faqs_and_side_table() {
        let site = assemble(AssembleInput {
            batches: vec![
                batch("faq", vec![faq("scope", "x.md", Some("legal-person"))]),
                batch("guidance", vec![guidance("legal-person.md")]),
            ],
            patches: vec![Patch::RelatedFaqs {
                guidance_key: "legal-person".into(),
                faqs: vec![link("scope", "x")],
            }],
            stats: stats(),
        });

        assert_eq!(site.guidance["legal-person"].related_faqs, vec![link("scope", "x")]);
        assert_eq!(
            site.cross_references.faq_to_guidance["scope/x"],
            "legal-person"
        );
        assert_eq!(
            site.cross_references.guidance_to_faqs["legal-person"],
            vec!["scope/x"]
        );
    }

    #[test]
    fn patches_from_two_sources_are_merged() {
        let site = assemble(AssembleInput {
            batches: vec![
                batch("faq", vec![faq("a", "z.md", None), faq("b", "m.md", None)]),
                batch("guidance", vec![guidance("g.md")]),
            ],
            patches: vec![
                Patch::RelatedFaqs {
                    guidance_key: "g".into(),
                    faqs: vec![link("a", "z")],
                },
                Patch::RelatedFaqs {
                    guidance_key: "g".into(),
                    faqs: vec![link("b", "m")],
                },
            ],
            stats: stats(),
        });
        let questions: Vec<_> = site.guidance["g"]
            .related_faqs
            .iter()
            .map(|l| l.question.as_str())
            .collect();
        assert_eq!(questions, vec!["m?", "z?"]);
    }

    #[test]
    fn links_to_excluded_items_are_pruned() {
        // "scope/gone" and the "missing" guidance failed validation upstream.
        let site = assemble(AssembleInput {
            batches: vec![
                batch(
                    "faq",
                    vec![faq("scope", "kept.md", None), faq("scope", "orphan.md", Some("missing"))],
                ),
                batch("guidance", vec![guidance("g.md")]),
                batch(
                    "lists",
                    vec![list("top.md", 1, vec![link("scope", "gone"), link("scope", "kept")])],
                ),
            ],
            patches: vec![Patch::RelatedFaqs {
                guidance_key: "g".into(),
                faqs: vec![link("scope", "gone"), link("scope", "kept")],
            }],
            stats: stats(),
        });

        assert_eq!(site.lists["top"].items, vec![link("scope", "kept")]);
        assert_eq!(site.guidance["g"].related_faqs, vec![link("scope", "kept")]);
        assert!(site.faqs["scope/orphan"].related_guidance.is_none());
        assert_eq!(site.cross_references.list_to_faqs["top"], vec!["scope/kept"]);
        assert!(site.cross_references.faq_to_guidance.is_empty());
    }

    #[test]
    fn list_order_by_order_then_discovery() {
        let site = assemble(AssembleInput {
            batches: vec![batch(
                "lists",
                vec![
                    list("c.md", 999, vec![]),
                    list("a.md", 2, vec![]),
                    list("b.md", 1, vec![]),
                    list("d.md", 2, vec![]),
                ],
            )],
            patches: vec![],
            stats: stats(),
        });
        assert_eq!(site.list_order, vec!["b", "a", "d", "c"]);
        let titles: Vec<_> = site.ordered_lists().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["b.md", "a.md", "d.md", "c.md"]);
    }

    #[test]
    fn duplicate_keys_keep_first() {
        let site = assemble(AssembleInput {
            batches: vec![
                batch("guidance", vec![guidance("g.md")]),
                batch("more-guidance", vec![guidance("g.md")]),
            ],
            patches: vec![],
            stats: stats(),
        });
        assert_eq!(site.guidance.len(), 1);
        assert!(site.categories["more-guidance"].is_empty());
    }

    #[test]
    fn serialized_shape_is_camel_case() {
        let site = assemble(AssembleInput {
            batches: vec![batch("faq", vec![faq("scope", "a.md", None)])],
            patches: vec![],
            stats: stats(),
        });
        let value = serde_json::to_value(&site).unwrap();
        assert!(value.get("listOrder").is_some());
        assert!(value["crossReferences"].get("faqToGuidance").is_some());
        assert_eq!(value["stats"]["schemaVersion"], "abc");
        assert_eq!(value["faqs"]["scope/a"]["url"], "/faq/scope/a/");
    }
}
