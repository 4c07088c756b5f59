//! On-disk artifacts produced by a build.
//!
//! - [`write_json`]: atomic pretty-printed JSON (site data, debug snapshots)
//! - [`ValidationLog`]: JSON-lines log of schema failures, reset per build
//! - [`schema_set_version`]: digest tag identifying the schema files in use

mod schema_version;
mod validation_log;
mod writer;

pub use schema_version::{SCHEMA_FILE_SUFFIX, schema_set_version};
pub use validation_log::{ValidationLog, ValidationLogEntry};
pub use writer::{write_debug_snapshot, write_json};
