//! CLI binary entry point for admission-report

#[cfg(feature = "cli")]
use admission_report::cli::commands::generate::{
    FilenameArgs, GenerateArgs, handle_filename, handle_generate,
};
#[cfg(feature = "cli")]
use admission_report::cli::commands::validate::handle_validate;
#[cfg(feature = "cli")]
use admission_report::cli::error::CliError;
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "admission-report")]
#[command(about = "Generate PDF admission reports from applicant records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Render a record to PDF and print the written path
    Generate {
        /// Record file (.json, .yaml or .yml)
        input: PathBuf,
        /// Output directory (default: [output] directory from config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Report date as YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Config file (default: ./.admission-report.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
    },
    /// Check required fields and status values
    Validate {
        /// Record file (.json, .yaml or .yml)
        input: PathBuf,
    },
    /// Print the filename a report would be written to
    Filename {
        /// Record file (.json, .yaml or .yml)
        input: PathBuf,
        /// Report date as YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            input,
            output_dir,
            date,
            config,
            force,
        } => {
            let args = GenerateArgs {
                input,
                output_dir,
                date,
                config,
                force,
            };
            let runtime =
                tokio::runtime::Runtime::new().map_err(|e| CliError::RuntimeError(e.to_string()))?;
            let path = runtime.block_on(handle_generate(&args))?;
            println!("{}", path.display());
        }
        Commands::Validate { input } => handle_validate(&input)?,
        Commands::Filename { input, date } => {
            let filename = handle_filename(&FilenameArgs { input, date })?;
            println!("{}", filename);
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
