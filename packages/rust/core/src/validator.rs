//! Schema validation and filtering of enhanced items.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use faqkit_artifacts::{SCHEMA_FILE_SUFFIX, ValidationLog, ValidationLogEntry};
use faqkit_shared::{FaqkitError, Result, ValidationIssue};
use tracing::{debug, info, instrument, warn};

use crate::items::ContentItem;
use crate::schema::Schema;

/// Schemas loaded from the schema directory, keyed by name
/// (`faq.schema.json` is `faq`).
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    schemas: HashMap<String, Schema>,
}

impl SchemaStore {
    /// Load every `*.schema.json` file in `dir`.
    ///
    /// A missing directory yields an empty store. A file that cannot be read,
    /// is not a usable schema, or uses a keyword that cannot be enforced is
    /// an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut schemas = HashMap::new();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "schema directory not found, validation disabled");
            return Ok(Self { schemas });
        }

        let entries = std::fs::read_dir(dir).map_err(|e| FaqkitError::io(dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| FaqkitError::io(dir, e))?.path();
            let Some(name) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_suffix(SCHEMA_FILE_SUFFIX))
            else {
                continue;
            };

            let text = std::fs::read_to_string(&path).map_err(|e| FaqkitError::io(&path, e))?;
            let schema: Schema = serde_json::from_str(&text).map_err(|e| {
                FaqkitError::schema(format!("{}: {e}", path.display()))
            })?;
            let unsupported = schema.unsupported_keywords();
            if !unsupported.is_empty() {
                return Err(FaqkitError::schema(format!(
                    "{}: unsupported keyword(s) {}",
                    path.display(),
                    unsupported.join(", ")
                )));
            }
            debug!(schema = name, "loaded schema");
            schemas.insert(name.to_string(), schema);
        }

        Ok(Self { schemas })
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        self.schemas.insert(name.into(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// An item that failed validation, with every problem found.
#[derive(Debug, Clone)]
pub struct InvalidItem {
    pub item: ContentItem,
    pub errors: Vec<ValidationIssue>,
    /// Position in the validated batch.
    pub index: usize,
}

/// Validated batch split into passing and failing items.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub valid_items: Vec<ContentItem>,
    pub invalid_items: Vec<InvalidItem>,
}

/// Validates batches against the schema store and logs every failure.
pub struct Validator {
    schemas: SchemaStore,
    log: ValidationLog,
}

impl Validator {
    pub fn new(schemas: SchemaStore, log: ValidationLog) -> Self {
        Self { schemas, log }
    }

    pub fn log(&self) -> &ValidationLog {
        &self.log
    }

    /// Check every item against `schema_name`.
    ///
    /// A missing schema means the batch passes. Failures are collected for
    /// the whole batch, appended to the validation log and only counted on
    /// the console.
    #[instrument(skip_all, fields(context = %context, schema = ?schema_name))]
    pub fn validate(
        &self,
        items: Vec<ContentItem>,
        schema_name: Option<&str>,
        context: &str,
    ) -> ValidationOutcome {
        let Some((name, schema)) =
            schema_name.and_then(|name| self.schemas.get(name).map(|s| (name, s)))
        else {
            if !items.is_empty() {
                warn!(context, schema = ?schema_name, "no schema found, items pass unchecked");
            }
            return ValidationOutcome {
                valid_items: items,
                invalid_items: Vec::new(),
            };
        };

        let mut outcome = ValidationOutcome::default();
        for (index, item) in items.into_iter().enumerate() {
            let errors = match serde_json::to_value(&item) {
                Ok(value) => schema.validate(&value),
                Err(e) => vec![ValidationIssue {
                    path: "/".into(),
                    message: format!("item could not be serialized: {e}"),
                    value: None,
                }],
            };

            if errors.is_empty() {
                outcome.valid_items.push(item);
                continue;
            }

            let entry = ValidationLogEntry {
                timestamp: Utc::now(),
                context: context.to_string(),
                schema: name.to_string(),
                index,
                filename: Some(item.base().filename.clone()),
                url: Some(item.base().url.clone()),
                errors: errors.clone(),
            };
            if let Err(e) = self.log.append(&entry) {
                warn!(error = %e, "failed to write validation log entry");
            }
            outcome.invalid_items.push(InvalidItem {
                item,
                errors,
                index,
            });
        }

        if outcome.invalid_items.is_empty() {
            debug!(valid = outcome.valid_items.len(), "all items valid");
        } else {
            info!(
                valid = outcome.valid_items.len(),
                invalid = outcome.invalid_items.len(),
                log = %self.log.path().display(),
                "{} {context} item(s) failed validation",
                outcome.invalid_items.len()
            );
        }
        outcome
    }
}
