//! hotels-merge CLI - merge supplier hotel feeds and serve the catalog
//!
//! # Main Command
//!
//! ```bash
//! hotels-merge                      # Fetch all feeds, serve on 127.0.0.1:8085
//! ```
//!
//! Reads the mapping document from `./mapping.json`; exits non-zero when the
//! mapping is unreadable or unparseable.
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! hotels-merge transform acme=fixtures/acme.json   # Merge local payloads
//! hotels-merge vocabulary                          # Show amenity vocabularies
//! ```

use clap::{Parser, Subcommand};
use hotels_merge::mapping::actions::{GENERAL_AMENITY_VOCABULARY, ROOM_AMENITY_VOCABULARY};
use hotels_merge::{
    api, fetch_and_merge, load_suppliers, HotelStore, MappingEngine,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "127.0.0.1:8085";
const DEFAULT_MAPPING: &str = "./mapping.json";
const DEFAULT_SUPPLIERS: &str = "./suppliers.json";

#[derive(Parser)]
#[command(name = "hotels-merge")]
#[command(about = "Merge supplier hotel feeds into a normalized catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all supplier feeds and serve the merged catalog (the default)
    Serve {
        /// Bind address (falls back to HOTELS_MERGE_ADDR, then 127.0.0.1:8085)
        #[arg(long)]
        addr: Option<String>,

        /// Mapping document path
        #[arg(long, default_value = DEFAULT_MAPPING)]
        mapping: PathBuf,

        /// Supplier list override file
        #[arg(long, default_value = DEFAULT_SUPPLIERS)]
        suppliers: PathBuf,
    },

    /// Merge local supplier payload files and print the catalog JSON
    Transform {
        /// Mapping document path
        #[arg(long, default_value = DEFAULT_MAPPING)]
        mapping: PathBuf,

        /// Supplier payloads as name=path pairs
        #[arg(required = true)]
        payloads: Vec<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the amenity vocabulary tables
    Vocabulary,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            cmd_serve(
                None,
                Path::new(DEFAULT_MAPPING),
                Path::new(DEFAULT_SUPPLIERS),
            )
            .await
        }

        Some(Commands::Serve {
            addr,
            mapping,
            suppliers,
        }) => cmd_serve(addr, &mapping, &suppliers).await,

        Some(Commands::Transform {
            mapping,
            payloads,
            output,
        }) => cmd_transform(&mapping, &payloads, output.as_deref()),

        Some(Commands::Vocabulary) => cmd_vocabulary(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn cmd_serve(
    addr: Option<String>,
    mapping_path: &Path,
    suppliers_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = addr
        .or_else(|| std::env::var("HOTELS_MERGE_ADDR").ok())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string())
        .parse()?;

    let mapping_bytes = fs::read(mapping_path)
        .map_err(|e| format!("cannot read mapping file {}: {e}", mapping_path.display()))?;
    let engine = MappingEngine::new(&mapping_bytes)?;
    info!(mapping = %mapping_path.display(), "mapping document loaded");

    let suppliers = load_suppliers(suppliers_path);
    let hotels = fetch_and_merge(&engine, &suppliers).await?;

    let store = Arc::new(HotelStore::new());
    store.set(hotels);
    info!(hotels = store.len(), "catalog populated");

    api::start_server(addr, store).await
}

fn cmd_transform(
    mapping_path: &Path,
    payload_args: &[String],
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mapping_bytes = fs::read(mapping_path)
        .map_err(|e| format!("cannot read mapping file {}: {e}", mapping_path.display()))?;
    let engine = MappingEngine::new(&mapping_bytes)?;

    let mut payloads = BTreeMap::new();
    for arg in payload_args {
        let (name, path) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected name=path, got '{arg}'"))?;
        payloads.insert(name.to_string(), fs::read(path)?);
    }

    let outcome = engine.transform(&payloads)?;
    eprintln!("{}", outcome.summary());
    for skip in &outcome.skipped {
        eprintln!("  skipped {}: {}", skip.identity, skip.reason);
    }

    let json = serde_json::to_string_pretty(&outcome.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_vocabulary() -> Result<(), Box<dyn std::error::Error>> {
    println!("General amenities:");
    for (spelling, canonical) in GENERAL_AMENITY_VOCABULARY {
        println!("  {spelling:<16} -> {canonical}");
    }
    println!("\nRoom amenities:");
    for (spelling, canonical) in ROOM_AMENITY_VOCABULARY {
        println!("  {spelling:<16} -> {canonical}");
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("output written to: {}", p.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
