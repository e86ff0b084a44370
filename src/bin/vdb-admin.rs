//! VDB Admin command line tool
//!
//! Queries an engine snapshot the way a management console would.
//!
//! ## Usage
//!
//! ```bash
//! # Connector bindings whose name starts with "oracle"
//! vdb-admin --snapshot engine.json objects ConnectorBinding 'oracle*'
//!
//! # Several kinds at once, failures reported after the objects
//! vdb-admin --snapshot engine.json batch '*' ConnectorBinding ConnectorType SystemObject
//!
//! # Property definitions of one binding
//! vdb-admin --snapshot engine.json properties oracle_prod
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use vdb_admin::{logging, AdminFacade, Config, InMemoryEngine, Matcher, NoCrypto};

/// Read-only administration of a virtual database engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Engine snapshot (JSON) to query
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Configuration file path; defaults to vdb-admin.toml lookup
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Admin objects of one kind matching a pattern
    Objects {
        kind: String,
        #[arg(default_value = "*")]
        pattern: String,
    },
    /// Admin objects of several kinds matching a pattern
    Batch {
        pattern: String,
        #[arg(required = true)]
        kinds: Vec<String>,
    },
    /// Sessions of connected clients matching a pattern
    Sessions {
        #[arg(default_value = "*")]
        pattern: String,
    },
    /// Property definitions of a deployed connector binding
    Properties { binding: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .context("loading configuration")?;
    logging::init(&config.logging)?;

    let json = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot.display()))?;
    let engine = Arc::new(InMemoryEngine::from_json(&json).context("parsing snapshot")?);
    let admin = AdminFacade::from_in_memory(engine, Arc::new(NoCrypto))
        .with_matcher(Matcher::from_config(&config.matching));
    info!(snapshot = %cli.snapshot.display(), "snapshot_loaded");

    let output = match cli.command {
        Command::Objects { kind, pattern } => {
            serde_json::to_string_pretty(&admin.get_admin_objects(&pattern, &kind)?)?
        }
        Command::Batch { pattern, kinds } => {
            let kinds: Vec<&str> = kinds.iter().map(String::as_str).collect();
            let outcome = admin.get_admin_objects_batch(&pattern, &kinds)?;
            if let Some(failures) = &outcome.failures {
                eprintln!("{failures}");
            }
            serde_json::to_string_pretty(&outcome.objects)?
        }
        Command::Sessions { pattern } => serde_json::to_string_pretty(&admin.sessions(&pattern)?)?,
        Command::Properties { binding } => {
            serde_json::to_string_pretty(&admin.binding_property_definitions(&binding)?)?
        }
    };
    println!("{output}");
    Ok(())
}
