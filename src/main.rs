//! Binary entry point for kwdoc.
//!
//! This binary is a command-line editor host for the keyword annotator.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use kwdoc::cli::{self, HoverPosition, OutputFormat};
use kwdoc::config::KwdocConfig;
use kwdoc::observability::{self, InitOptions};
use kwdoc::services::{EditorActions, global_annotator};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

/// kwdoc - SQL keyword documentation for editors.
#[derive(Parser)]
#[command(name = "kwdoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "KWDOC_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Path to the keyword dictionary (overrides configuration).
    #[arg(short, long, global = true)]
    keywords: Option<PathBuf>,

    /// Output format.
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        ignore_case = true,
        default_value_t = OutputFormat::Text
    )]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Show the keyword under a position in a SQL file.
    Hover {
        /// The SQL file.
        file: PathBuf,

        /// 1-based line number.
        #[arg(short, long)]
        line: usize,

        /// 1-based column number, in characters.
        #[arg(short = 'C', long)]
        column: usize,
    },

    /// List every keyword occurrence in a SQL file.
    Scan {
        /// The SQL file.
        file: PathBuf,

        /// Only list keywords that have a documentation link.
        #[arg(long)]
        lenses: bool,
    },

    /// Print the documentation URL for a keyword.
    Lookup {
        /// The keyword (multi-word keywords may be quoted).
        keyword: String,
    },

    /// Resolve the open-documentation action for a keyword.
    Open {
        /// The keyword (multi-word keywords may be quoted).
        keyword: String,
    },

    /// List the loaded keyword dictionary.
    Keywords,

    /// Watch the dictionary and hot-reload it on change.
    Watch,
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Loads configuration: explicit file, else default location, then
/// environment and CLI overrides.
fn load_config(cli: &Cli) -> Result<KwdocConfig, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => KwdocConfig::load_from_file(path)?,
        None => KwdocConfig::load_default(),
    };
    let config = config.with_env_overrides();

    Ok(match &cli.keywords {
        Some(path) => config.with_keywords_path(path),
        None => config,
    })
}

/// Runs the selected command.
async fn run_command(cli: Cli, config: KwdocConfig) -> Result<(), Box<dyn std::error::Error>> {
    let format = cli.format;
    let annotator = global_annotator();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if matches!(cli.command, Commands::Watch) {
        return cli::cmd_watch(
            &mut out,
            annotator,
            &config.keywords_path,
            config.poll_interval,
            async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            },
        )
        .await;
    }

    let outcome = annotator.reload(&config.keywords_path);
    if !outcome.is_loaded() {
        eprintln!(
            "warning: no keywords loaded from {} ({})",
            config.keywords_path.display(),
            outcome.label()
        );
    }
    let actions = EditorActions::new(annotator, config.language_id.clone());

    match cli.command {
        Commands::Hover { file, line, column } => cli::cmd_hover(
            &mut out,
            &actions,
            &file,
            HoverPosition { line, column },
            format,
        ),
        Commands::Scan { file, lenses } => {
            cli::cmd_scan(&mut out, annotator, &actions, &file, lenses, format)
        },
        Commands::Lookup { keyword } => cli::cmd_lookup(&mut out, annotator, &keyword),
        Commands::Open { keyword } => cli::cmd_open(&mut out, &actions, &keyword, format),
        Commands::Keywords => cli::cmd_keywords(&mut out, annotator, format, cli.verbose),
        Commands::Watch => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_accepts_known_values() {
        let cli = Cli::try_parse_from(["kwdoc", "--format", "JSON", "keywords"]).expect("json");
        assert_eq!(cli.format, OutputFormat::Json);
        let cli = Cli::try_parse_from(["kwdoc", "keywords"]).expect("default");
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_format_rejects_unknown_value() {
        assert!(Cli::try_parse_from(["kwdoc", "--format", "jsno", "keywords"]).is_err());
    }
}
