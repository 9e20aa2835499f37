//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod graph;

/// Neo4j schema explorer
#[derive(Parser)]
#[command(name = "pss")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Load environment variables from this file instead of the nearest .env
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show node labels, relationship types and property keys
    Schema {
        /// Print the schema as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the property keys of a node label
    Nodes {
        /// Node label, e.g. Patent
        label: String,
        /// Print the properties as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the property keys of a relationship type
    Rels {
        /// Relationship type, e.g. CITES
        rel_type: String,
        /// Print the properties as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that Neo4j is reachable
    Ping,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let explorer = pss_graph::SchemaExplorer::from_env()
            .context("Neo4j is not configured (set NEO4J_URI, NEO4J_USERNAME and NEO4J_PASSWORD)")?;

        match self.command {
            Commands::Schema { json } => graph::cmd_schema(&explorer, json).await,
            Commands::Nodes { label, json } => graph::cmd_nodes(&explorer, &label, json).await,
            Commands::Rels { rel_type, json } => graph::cmd_rels(&explorer, &rel_type, json).await,
            Commands::Ping => graph::cmd_ping(&explorer).await,
        }
    }
}
