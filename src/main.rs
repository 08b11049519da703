use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use fertiscan_metadata::sync;
use fertiscan_metadata::{MetadataError, Result};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "FERTISCAN_LOG";

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| MetadataError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Import(args) => {
            require_input(&args.input)?;
            sync::form_to_document(&args.input, &args.output, args.inspector_id)
        }
        Command::Persist(args) => {
            require_input(&args.input)?;
            let persisted = sync::form_to_store(&args.input, &args.store, args.inspector_id)?;
            if let Some(inspection_id) = persisted.inspection_id {
                println!("{inspection_id}");
            }
            Ok(())
        }
        Command::Export(args) => {
            require_input(&args.store)?;
            sync::store_to_document(&args.store, args.inspection_id, &args.output)
        }
    }
}

fn require_input(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(MetadataError::MissingInput(path.to_path_buf()))
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert fertilizer label analysis forms to and from inspection documents."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate an analysis form and write the inspection document.
    Import(ImportArgs),
    /// Import an analysis form and persist it into a store snapshot.
    Persist(PersistArgs),
    /// Rebuild the inspection document of a persisted inspection.
    Export(ExportArgs),
}

#[derive(clap::Args)]
struct ImportArgs {
    /// Analysis form produced by the digitization pipeline.
    #[arg(long)]
    input: PathBuf,

    /// Inspector responsible for the inspection.
    #[arg(long)]
    inspector_id: Uuid,

    /// Output path of the inspection document.
    #[arg(long)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct PersistArgs {
    /// Analysis form produced by the digitization pipeline.
    #[arg(long)]
    input: PathBuf,

    /// Inspector responsible for the inspection.
    #[arg(long)]
    inspector_id: Uuid,

    /// Store snapshot to persist into. Created when missing.
    #[arg(long)]
    store: PathBuf,
}

#[derive(clap::Args)]
struct ExportArgs {
    /// Store snapshot holding the inspection.
    #[arg(long)]
    store: PathBuf,

    /// Inspection to export.
    #[arg(long)]
    inspection_id: Uuid,

    /// Output path of the inspection document.
    #[arg(long)]
    output: PathBuf,
}
