//! End-to-end build pipeline: discover → parse → enhance → post-process →
//! validate → assemble.
//!
//! Every phase finishes for all content types before the next one starts.
//! Per-file and per-item problems are logged and skipped; only setup errors
//! (registry, schemas, validation log) abort a build.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use faqkit_artifacts::{ValidationLog, schema_set_version, write_debug_snapshot, write_json};
use faqkit_discovery::{read_document, walk};
use faqkit_markdown::CmarkRenderer;
use faqkit_shared::{AppConfig, BaseItem, BuildId, ContentFile, Result};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::assembler::{AssembleInput, BuildStats, SiteData, TypeBatch, TypeStats, assemble};
use crate::crossref::{Corpus, Patch};
use crate::enhance::EnhanceContext;
use crate::items::ContentItem;
use crate::parser::parse_base;
use crate::registry::Registry;
use crate::validator::{InvalidItem, SchemaStore, Validator};

/// Front-matter key naming the document type, used for rerouting.
pub const DOCUMENT_TYPE_KEY: &str = "type";

/// Result of one build.
#[derive(Debug)]
pub struct BuildResult {
    /// The assembled structure.
    pub site: SiteData,
    /// Items excluded by validation, with their type name.
    pub invalid: Vec<(String, InvalidItem)>,
    /// Where validation failures were written.
    pub validation_log: PathBuf,
    /// FAQ snapshot path, when it could be written.
    pub debug_snapshot: Option<PathBuf>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl BuildResult {
    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each file has been read.
    fn file_processed(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_processed(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Run the full build.
#[instrument(skip_all, fields(content_root = %config.content_root().display()))]
pub fn run_build(config: &AppConfig, progress: &dyn ProgressReporter) -> Result<BuildResult> {
    let start = Instant::now();
    let build_id = BuildId::new();

    info!(%build_id, "starting build");

    // --- Setup ---
    let registry = Registry::from_config(config)?;
    let schema_dir = config.schema_dir();
    let schemas = SchemaStore::load(&schema_dir)?;
    let schema_version = match &config.schemas.version {
        Some(version) => Some(version.clone()),
        None => schema_set_version(&schema_dir)?,
    };
    let log = ValidationLog::create(config.validation_log_path())?;
    let validation_log = log.path().to_path_buf();
    let validator = Validator::new(schemas, log);
    let renderer = CmarkRenderer::default();

    let type_count = registry.types().len();
    let mut stats: Vec<TypeStats> = vec![TypeStats::default(); type_count];

    // --- Phase 1: Discovery ---
    progress.phase("Discovering content");
    let mut discovered: Vec<Vec<ContentFile>> = Vec::with_capacity(type_count);
    for (i, ty) in config.types.iter().enumerate() {
        let files = walk(&config.type_root(ty), &ty.name);
        stats[i].discovered = files.len();
        discovered.push(files);
    }
    let total_files: usize = discovered.iter().map(Vec::len).sum();
    info!(files = total_files, "discovery complete");

    // --- Phase 2: Read + base parse ---
    progress.phase("Parsing documents");
    let mut parsed: Vec<Vec<BaseItem>> = vec![Vec::new(); type_count];
    let mut current = 0;
    for (i, files) in discovered.into_iter().enumerate() {
        for file in files {
            current += 1;
            progress.file_processed(&file.full_path.display().to_string(), current, total_files);

            let doc = match read_document(&file.full_path) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(
                        path = %file.full_path.display(),
                        error = %e,
                        "failed to read document, skipping"
                    );
                    stats[i].read_errors += 1;
                    continue;
                }
            };

            let target = doc
                .front_matter
                .get(DOCUMENT_TYPE_KEY)
                .and_then(Value::as_str)
                .and_then(|doc_type| registry.claimant(doc_type))
                .unwrap_or(i);
            if target != i {
                debug!(
                    file = %file.filename,
                    from = %file.content_type,
                    to = %registry.types()[target].name,
                    "document rerouted by its type"
                );
            }

            let type_name = &registry.types()[target].name;
            if let Some(item) = parse_base(doc, &file.filename, &file.category, type_name) {
                parsed[target].push(item);
            }
        }
    }
    for (i, items) in parsed.iter().enumerate() {
        stats[i].parsed = items.len();
    }

    // --- Phase 3: Enhance ---
    progress.phase("Enhancing items");
    let ctx = EnhanceContext {
        renderer: &renderer,
    };
    let enhanced: Vec<(String, Vec<ContentItem>)> = registry
        .types()
        .iter()
        .zip(parsed)
        .map(|(ty, items)| {
            let items: Vec<ContentItem> = items
                .into_iter()
                .map(|base| (ty.enhance)(base, &ctx))
                .collect();
            (ty.name.clone(), items)
        })
        .collect();

    // --- Phase 4: Post-process ---
    progress.phase("Linking cross-references");
    let mut processed: Vec<Vec<ContentItem>> = Vec::with_capacity(type_count);
    let mut patches: Vec<Patch> = Vec::new();
    {
        let corpus = Corpus::new(&enhanced);
        for (ty, (_, items)) in registry.types().iter().zip(&enhanced) {
            let items = match ty.post_process {
                Some(post_process) => {
                    let output = post_process(items.clone(), &corpus);
                    patches.extend(output.patches);
                    output.items
                }
                None => items.clone(),
            };
            processed.push(items);
        }
    }
    drop(enhanced);

    // --- Phase 5: Validate ---
    progress.phase("Validating");
    let mut batches: Vec<TypeBatch> = Vec::with_capacity(type_count);
    let mut invalid: Vec<(String, InvalidItem)> = Vec::new();
    for (i, (ty, items)) in registry.types().iter().zip(processed).enumerate() {
        let outcome = validator.validate(items, ty.schema.as_deref(), &ty.name);
        stats[i].valid = outcome.valid_items.len();
        stats[i].invalid = outcome.invalid_items.len();
        invalid.extend(
            outcome
                .invalid_items
                .into_iter()
                .map(|item| (ty.name.clone(), item)),
        );
        batches.push(TypeBatch {
            name: ty.name.clone(),
            items: outcome.valid_items,
        });
    }
    if !invalid.is_empty() {
        warn!(
            invalid = invalid.len(),
            log = %validation_log.display(),
            "some items failed validation and were excluded"
        );
    }

    // --- Phase 6: Assemble ---
    progress.phase("Assembling site data");
    let site = assemble(AssembleInput {
        batches,
        patches,
        stats: BuildStats {
            build_id,
            processed_at: Utc::now(),
            schema_version,
            types: registry
                .types()
                .iter()
                .map(|ty| ty.name.clone())
                .zip(stats)
                .collect(),
        },
    });

    let debug_snapshot = match write_debug_snapshot(&config.debug_dir(), "faqs", &site.faqs) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, "failed to write FAQ debug snapshot");
            None
        }
    };

    let result = BuildResult {
        site,
        invalid,
        validation_log,
        debug_snapshot,
        elapsed: start.elapsed(),
    };

    info!(
        items = result.site.item_count(),
        invalid = result.invalid_count(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "build complete"
    );

    progress.done(&result);
    Ok(result)
}

/// Write the assembled structure as pretty JSON.
pub fn write_output(site: &SiteData, path: &Path) -> Result<()> {
    write_json(path, site)?;
    info!(path = %path.display(), "site data written");
    Ok(())
}
