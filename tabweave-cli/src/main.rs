//! # tabweave CLI
//!
//! Command-line interface for the tabweave reference-document generator.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tabweave")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all artifacts from a root document
    Build {
        /// Root YAML document to process
        input: PathBuf,

        /// Directory to write the generated artifacts into
        output: PathBuf,
    },

    /// Load a document and report diagnostics without writing anything
    Check {
        /// Root YAML document to process
        input: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Build { input, output } => commands::build_document(&input, &output),
        Commands::Check { input, json } => commands::check_document(&input, json),
    }
}
