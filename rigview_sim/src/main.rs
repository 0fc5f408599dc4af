//! RigView CLI
//!
//! Materialize a configuration store and query its proxy entities.

use clap::Parser;
use rigview_env::{DuplicatePolicy, EnvConfig, Environment, StoreSource};
use rigview_sim::{queries, reference_store, JsonFileSource, Query, SimError};
use std::path::PathBuf;
use tracing::{debug, error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// RigView environment inspector
#[derive(Parser, Debug)]
#[command(name = "rigview")]
#[command(about = "Materialize a hardware configuration and query its entities", long_about = None)]
struct Args {
    /// JSON configuration store (defaults to the built-in reference data)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List every entity of one category
    #[arg(long)]
    category: Option<String>,

    /// Show one entity by id
    #[arg(short, long)]
    entity: Option<String>,

    /// Resolve a reference-list field of --entity
    #[arg(short, long)]
    resolve: Option<String>,

    /// List every entity of every category
    #[arg(long)]
    dump: bool,

    /// Ids shared between categories (reject, first-wins, last-wins)
    #[arg(long, default_value = "reject")]
    duplicates: DuplicatePolicy,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output
    #[arg(long)]
    json: bool,
}

fn execute(args: Args) -> Result<(), SimError> {
    let query = Query::from_selectors(args.category, args.entity, args.resolve, args.dump)?;
    let config = EnvConfig {
        duplicate_ids: args.duplicates,
    };

    let env = match &args.config {
        Some(path) => Environment::load(&JsonFileSource::new(path), config)?,
        None => {
            let store = reference_store()?;
            debug!("Using {}", store.describe());
            Environment::load(&store, config)?
        }
    };

    if !args.json {
        info!(
            "Materialized {} categories, {} entities (duplicates: {})",
            env.category_count(),
            env.entity_count(),
            env.config().duplicate_ids
        );
        info!("Query: {}", query);
    }

    let output = queries::run(&env, &query)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for line in output.lines() {
            println!("{}", line);
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if let Err(e) = execute(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
