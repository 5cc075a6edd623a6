use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use geoff_core::SubgraphReader;
use geoff_storage::{open_or_create, save_snapshot, Loader, MemoryStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Parse, validate and load Geoff graph documents
#[derive(Parser, Debug)]
#[command(name = "geoff")]
#[command(about = "Geoff graph notation tools", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse documents and print every subgraph they contain
    Validate {
        /// Print subgraphs as JSON instead of Geoff
        #[arg(long)]
        json: bool,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Load documents into a graph store
    Load {
        /// Snapshot to seed the store from and save it to afterwards
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting geoff v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Validate { json, files } => validate(&files, json),
        Command::Load { snapshot, files } => load(&files, snapshot.as_deref()),
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn validate(files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let mut failures = 0;
    for path in files {
        let source = read_source(path)?;
        println!("==== {} ====", path.display());
        for (index, subgraph) in SubgraphReader::new(&source).enumerate() {
            match subgraph {
                Ok(subgraph) => {
                    println!("---- subgraph {} ----", index);
                    if json {
                        println!("{}", serde_json::to_string_pretty(&subgraph.to_json())?);
                    } else {
                        println!("{}", subgraph);
                    }
                }
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    failures += 1;
                }
            }
        }
    }
    if failures > 0 {
        bail!("{} of {} documents failed to parse", failures, files.len());
    }
    Ok(())
}

fn load(files: &[PathBuf], snapshot: Option<&Path>) -> anyhow::Result<()> {
    let store = match snapshot {
        Some(path) => open_or_create(path)?,
        None => MemoryStore::new(),
    };
    let loader = Loader::new(&store);

    for path in files {
        let source = read_source(path)?;
        info!(file = %path.display(), "Loading document");
        for (index, subgraph) in SubgraphReader::new(&source).enumerate() {
            let subgraph =
                subgraph.with_context(|| format!("Failed to parse {}", path.display()))?;
            let report = loader.load(&subgraph)?;
            for (name, id) in &report.named {
                println!("{}\t{}\t{}", index, serde_json::Value::from(name.as_str()), id);
            }
        }
    }

    info!(
        nodes = store.node_count(),
        relationships = store.relationship_count(),
        "Store updated"
    );
    if let Some(path) = snapshot {
        save_snapshot(&store, path)?;
    }
    Ok(())
}
