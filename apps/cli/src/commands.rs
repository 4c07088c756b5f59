//! CLI command definitions, routing, and tracing setup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use faqkit_core::pipeline::{BuildResult, ProgressReporter, run_build, write_output};
use faqkit_core::validator::InvalidItem;
use faqkit_shared::{AppConfig, init_config, resolve_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// faqkit: turn markdown FAQ content into validated site data.
#[derive(Parser)]
#[command(
    name = "faqkit",
    version,
    about = "Build cross-referenced, schema-validated site data from markdown FAQ content.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the pipeline and write the site data JSON.
    Build {
        /// Config file (defaults to ./faqkit.toml, then ~/.faqkit/faqkit.toml).
        #[arg(short, long, env = "FAQKIT_CONFIG")]
        config: Option<PathBuf>,

        /// Output file (overrides `paths.output`).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run the pipeline without writing output; fail if any item is invalid.
    Check {
        /// Config file (defaults to ./faqkit.toml, then ~/.faqkit/faqkit.toml).
        #[arg(short, long, env = "FAQKIT_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show {
        /// Config file to resolve instead of the default lookup.
        #[arg(short, long, env = "FAQKIT_CONFIG")]
        config: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "faqkit=info",
        1 => "faqkit=debug",
        _ => "faqkit=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build { config, out } => cmd_build(config.as_deref(), out.as_deref()),
        Command::Check { config } => cmd_check(config.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show { config } => cmd_config_show(config.as_deref()),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(config_path: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let output = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_path());

    info!(
        content_root = %config.content_root().display(),
        output = %output.display(),
        "building site data"
    );

    let reporter = CliProgress::new();
    let result = run_build(&config, &reporter)?;
    write_output(&result.site, &output)?;

    print_summary(&result);
    println!("  Output: {}", output.display());
    println!();

    Ok(())
}

fn cmd_check(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;

    let reporter = CliProgress::new();
    let result = run_build(&config, &reporter)?;
    print_summary(&result);

    if result.invalid.is_empty() {
        println!("  All items valid.");
        println!();
        return Ok(());
    }

    for (type_name, count) in invalid_counts(&result.invalid) {
        println!("  ✗ {type_name:<10} {count} invalid item(s)");
    }
    println!();

    Err(eyre!(
        "{} item(s) failed validation, see {}",
        result.invalid_count(),
        result.validation_log.display()
    ))
}

/// Invalid items per type name. Error details stay in the validation log.
fn invalid_counts(invalid: &[(String, InvalidItem)]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for (type_name, _) in invalid {
        *counts.entry(type_name.as_str()).or_insert(0) += 1;
    }
    counts
}

fn print_summary(result: &BuildResult) {
    let stats = &result.site.stats;

    println!();
    println!("  Build:  {}", stats.build_id);
    if let Some(version) = &stats.schema_version {
        println!("  Schema: {version}");
    }
    println!();
    println!(
        "  {:<12} {:>10} {:>8} {:>8} {:>8} {:>8}",
        "type", "discovered", "errors", "parsed", "valid", "invalid"
    );
    for (name, t) in &stats.types {
        println!(
            "  {:<12} {:>10} {:>8} {:>8} {:>8} {:>8}",
            name, t.discovered, t.read_errors, t.parsed, t.valid, t.invalid
        );
    }
    println!();
    if result.invalid_count() > 0 {
        println!(
            "  {} item(s) excluded by validation (details: {})",
            result.invalid_count(),
            result.validation_log.display()
        );
    }
    println!("  Time:   {:.1}s", result.elapsed.as_secs_f64());
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_processed(&self, path: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Parsing [{current}/{total}] {path}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config: AppConfig = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("# base directory: {}", config.base_dir.display());
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use faqkit_core::items::{ContentItem, FaqItem};
    use faqkit_shared::{BaseItem, FrontMatter, ValidationIssue};

    fn invalid(type_name: &str, filename: &str) -> (String, InvalidItem) {
        let item = ContentItem::Faq(FaqItem {
            base: BaseItem {
                filename: filename.into(),
                category: "scope".into(),
                content_type: type_name.into(),
                raw_markdown: String::new(),
                url: format!("/faq/scope/{}/", filename.trim_end_matches(".md")),
                front_matter: FrontMatter::new(),
            },
            question: None,
            answer: None,
            status: None,
            guidance_id: None,
            related_guidance: None,
        });
        let errors = vec![ValidationIssue {
            path: "/question".into(),
            message: "required property is missing".into(),
            value: None,
        }];
        (type_name.to_string(), InvalidItem { item, errors, index: 0 })
    }

    #[test]
    fn invalid_items_are_counted_per_type() {
        let items = vec![
            invalid("faq", "a.md"),
            invalid("lists", "top.md"),
            invalid("faq", "b.md"),
        ];
        let counts = invalid_counts(&items);
        assert_eq!(counts.into_iter().collect::<Vec<_>>(), vec![("faq", 2), ("lists", 1)]);
    }

    #[test]
    fn no_invalid_items_no_counts() {
        assert!(invalid_counts(&[]).is_empty());
    }
}
