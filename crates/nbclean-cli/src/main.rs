use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{metadata::LevelFilter, Level};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

use nbclean_core::{CellMetadataPolicy, CleanConfig};

mod git;
mod inputs;

use inputs::Input;

/// nb-clean: clean Jupyter notebooks for versioning
///
/// Check for or remove execution counts, outputs, and metadata.
#[derive(Parser)]
#[command(name = "nb-clean", version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check notebooks are clean of execution counts, metadata, and outputs
    Check {
        /// Notebook files or directories (stdin if none)
        #[arg(value_name = "PATH")]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        flags: CleanFlags,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean notebooks of execution counts, metadata, and outputs
    Clean {
        /// Notebook files or directories, cleaned in place (stdin to stdout if none)
        #[arg(value_name = "PATH")]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        flags: CleanFlags,
    },

    /// Add Git filter to clean notebooks before staging
    AddFilter {
        #[command(flatten)]
        flags: CleanFlags,
    },

    /// Remove Git filter that cleans notebooks before staging
    RemoveFilter,

    /// Print version number
    Version,
}

#[derive(Args, Debug, Clone)]
struct CleanFlags {
    /// Remove empty cells
    #[arg(short = 'e', long)]
    remove_empty_cells: bool,
    /// Preserve cell metadata, all unless fields are specified
    #[arg(short = 'm', long, num_args = 0.., value_name = "FIELD")]
    preserve_cell_metadata: Option<Vec<String>>,
    /// Preserve cell outputs
    #[arg(short = 'o', long)]
    preserve_cell_outputs: bool,
    /// Preserve cell execution counts
    #[arg(short = 'c', long)]
    preserve_execution_counts: bool,
    /// Preserve notebook metadata such as language version
    #[arg(short = 'n', long)]
    preserve_notebook_metadata: bool,
    /// Remove all notebook metadata
    #[arg(short = 'M', long)]
    remove_all_notebook_metadata: bool,
}

impl CleanFlags {
    fn to_config(&self) -> nbclean_core::Result<CleanConfig> {
        let config = CleanConfig::new()
            .with_remove_empty_cells(self.remove_empty_cells)
            .with_cell_metadata(CellMetadataPolicy::from_cli(
                self.preserve_cell_metadata.clone(),
            ))
            .with_preserve_cell_outputs(self.preserve_cell_outputs)
            .with_preserve_execution_counts(self.preserve_execution_counts)
            .with_preserve_notebook_metadata(self.preserve_notebook_metadata)
            .with_remove_all_notebook_metadata(self.remove_all_notebook_metadata);
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Check {
            inputs,
            flags,
            json,
        } => match flags.to_config() {
            Ok(config) => run_check(&inputs, &config, json),
            Err(e) => error_exit_code(&e.to_string(), 2),
        },
        Commands::Clean { inputs, flags } => match flags.to_config() {
            Ok(config) => run_clean(&inputs, &config),
            Err(e) => error_exit_code(&e.to_string(), 2),
        },
        Commands::AddFilter { flags } => match flags.to_config() {
            Ok(config) => match git::add_filter(&config) {
                Ok(()) => 0,
                Err(e) => error_exit_code(&e.to_string(), e.code),
            },
            Err(e) => error_exit_code(&e.to_string(), 2),
        },
        Commands::RemoveFilter => match git::remove_filter() {
            Ok(()) => 0,
            Err(e) => error_exit_code(&e.to_string(), e.code),
        },
        Commands::Version => {
            println!("nb-clean {}", env!("CARGO_PKG_VERSION"));
            0
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let fmt = fmt::layer()
        .without_time()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(fmt)
        .with(LevelFilter::from_level(level))
        .init();
}

/// Print `nb-clean: error: <message>` to stderr and return `code`.
fn error_exit_code(message: &str, code: i32) -> i32 {
    eprintln!("{} {}", "nb-clean: error:".red().bold(), message.trim_end());
    code
}

// ── check ─────────────────────────────────────────────────

fn run_check(paths: &[PathBuf], config: &CleanConfig, json: bool) -> i32 {
    let mut all_clean = true;
    let mut failed = false;
    let mut files = Vec::new();

    for input in inputs::resolve(paths) {
        let name = input.name();
        let report = input
            .read_notebook()
            .and_then(|nb| nbclean_core::check_notebook(&nb, config).map_err(Into::into));

        match report {
            Ok(report) => {
                all_clean &= report.is_clean();
                if json {
                    files.push(serde_json::json!({
                        "path": name,
                        "clean": report.is_clean(),
                        "findings": report.messages(),
                    }));
                } else {
                    for finding in &report.findings {
                        println!("{}: {}", name.bold(), finding);
                    }
                }
            }
            Err(e) => {
                failed = true;
                tracing::warn!(path = %name, "skipping unreadable notebook");
                if json {
                    files.push(serde_json::json!({
                        "path": name,
                        "error": format!("{:#}", e),
                    }));
                } else {
                    error_exit_code(&format!("{}: {:#}", name, e), 1);
                }
            }
        }
    }

    if json {
        let output = serde_json::json!({
            "clean": all_clean && !failed,
            "files": files,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => return error_exit_code(&e.to_string(), 2),
        }
    }

    if all_clean && !failed {
        0
    } else {
        1
    }
}

// ── clean ─────────────────────────────────────────────────

fn run_clean(paths: &[PathBuf], config: &CleanConfig) -> i32 {
    let mut failed = false;

    for input in inputs::resolve(paths) {
        if let Err(e) = clean_one(&input, config) {
            failed = true;
            error_exit_code(&format!("{}: {:#}", input.name(), e), 1);
        }
    }

    if failed {
        1
    } else {
        0
    }
}

fn clean_one(input: &Input, config: &CleanConfig) -> anyhow::Result<()> {
    let notebook = input.read_notebook()?;
    let cleaned = nbclean_core::clean_notebook(&notebook, config)?;
    input.write_notebook(&notebook, &cleaned)
}
