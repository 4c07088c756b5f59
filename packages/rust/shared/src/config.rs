//! Application configuration for faqkit.
//!
//! The config file is `faqkit.toml`, looked up next to the working directory
//! first and then under `~/.faqkit/`. CLI flags override config file values,
//! which override defaults. Relative paths resolve against the directory the
//! config file was loaded from.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FaqkitError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "faqkit.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".faqkit";

// ---------------------------------------------------------------------------
// Config structs (matching faqkit.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Schema set settings.
    #[serde(default)]
    pub schemas: SchemasConfig,

    /// Content type registry, processed in declaration order.
    #[serde(default = "default_types")]
    pub types: Vec<ContentTypeConfig>,

    /// Directory relative paths are resolved against. Not serialized.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            schemas: SchemasConfig::default(),
            types: default_types(),
            base_dir: PathBuf::from("."),
        }
    }
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding one sub-directory per content type.
    #[serde(default = "default_content_root")]
    pub content_root: String,

    /// Directory holding `<schema>.schema.json` files.
    #[serde(default = "default_schema_dir")]
    pub schema_dir: String,

    /// Where the assembled site data JSON is written.
    #[serde(default = "default_output")]
    pub output: String,

    /// JSON-lines log of validation failures, truncated on every build.
    #[serde(default = "default_validation_log")]
    pub validation_log: String,

    /// Scratch directory for debug snapshots.
    #[serde(default = "default_debug_dir")]
    pub debug_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            schema_dir: default_schema_dir(),
            output: default_output(),
            validation_log: default_validation_log(),
            debug_dir: default_debug_dir(),
        }
    }
}

fn default_content_root() -> String {
    "content".into()
}
fn default_schema_dir() -> String {
    "schemas".into()
}
fn default_output() -> String {
    "build/site-data.json".into()
}
fn default_validation_log() -> String {
    "logs/validation.jsonl".into()
}
fn default_debug_dir() -> String {
    "tmp".into()
}

/// `[schemas]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemasConfig {
    /// Explicit schema-set version tag. When unset, a digest of the schema
    /// files is used instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Which enhancer family a content type uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Faq,
    Guidance,
    List,
}

/// `[[types]]` entry: one content type in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTypeConfig {
    /// Type name; also drives URL routing (`guidance`, `lists`, others → FAQ routes).
    pub name: String,
    /// Enhancer family.
    pub kind: ContentKind,
    /// Source directory, relative to `paths.content_root`.
    pub source: String,
    /// Schema name (`<schema_dir>/<schema>.schema.json`). `None` skips validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Front-matter `type` values that route a document found under another
    /// type's root to this type instead.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub claims: Vec<String>,
}

fn default_types() -> Vec<ContentTypeConfig> {
    vec![
        ContentTypeConfig {
            name: "faq".into(),
            kind: ContentKind::Faq,
            source: "faq".into(),
            schema: Some("faq".into()),
            claims: Vec::new(),
        },
        ContentTypeConfig {
            name: "guidance".into(),
            kind: ContentKind::Guidance,
            source: "pending-guidance".into(),
            schema: Some("guidance".into()),
            claims: vec!["guidance-request".into(), "pending-guidance".into()],
        },
        ContentTypeConfig {
            name: "lists".into(),
            kind: ContentKind::List,
            source: "lists".into(),
            schema: Some("list".into()),
            claims: Vec::new(),
        },
    ]
}

impl AppConfig {
    /// Resolve a configured path against [`AppConfig::base_dir`], expanding `~`.
    pub fn resolve(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    pub fn content_root(&self) -> PathBuf {
        self.resolve(&self.paths.content_root)
    }

    pub fn schema_dir(&self) -> PathBuf {
        self.resolve(&self.paths.schema_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.paths.output)
    }

    pub fn validation_log_path(&self) -> PathBuf {
        self.resolve(&self.paths.validation_log)
    }

    pub fn debug_dir(&self) -> PathBuf {
        self.resolve(&self.paths.debug_dir)
    }

    /// Source root of one content type.
    pub fn type_root(&self, ty: &ContentTypeConfig) -> PathBuf {
        self.content_root().join(&ty.source)
    }

    /// Reject registries the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.types.is_empty() {
            return Err(FaqkitError::config("no content types configured"));
        }

        let mut names = HashSet::new();
        for ty in &self.types {
            if ty.name.trim().is_empty() {
                return Err(FaqkitError::config("content type with empty name"));
            }
            if !names.insert(ty.name.as_str()) {
                return Err(FaqkitError::config(format!(
                    "duplicate content type '{}'",
                    ty.name
                )));
            }
        }

        let mut claimed = HashSet::new();
        for claim in self.types.iter().flat_map(|t| &t.claims) {
            if !claimed.insert(claim.as_str()) {
                return Err(FaqkitError::config(format!(
                    "document type '{claim}' is claimed by more than one content type"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.faqkit/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| FaqkitError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.faqkit/faqkit.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the user config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        let mut config = AppConfig::default();
        config.base_dir = std::env::current_dir().map_err(|e| FaqkitError::io(".", e))?;
        return Ok(config);
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FaqkitError::io(path, e))?;

    let mut config: AppConfig = toml::from_str(&content)
        .map_err(|e| FaqkitError::config(format!("failed to parse {}: {e}", path.display())))?;

    config.base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    config.validate()?;

    tracing::debug!(?path, types = config.types.len(), "loaded config");
    Ok(config)
}

/// Resolve the effective config: an explicit path, then `./faqkit.toml`,
/// then the user config, then defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    load_config()
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FaqkitError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| FaqkitError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FaqkitError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
