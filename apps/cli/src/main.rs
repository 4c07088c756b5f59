//! faqkit CLI: build the site data of an FAQ content tree.
//!
//! Discovers FAQ, guidance and list documents, cross-references and
//! validates them, and writes the consolidated JSON consumed by the site
//! renderer.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
