//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use revgraph_core::Settings;

pub mod cache;
pub mod db;
pub mod run;
pub mod status;

/// Rebuild review graphs in Neo4j from the relational review store
#[derive(Parser)]
#[command(name = "revgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file (defaults to ./revgraph.toml if present)
    #[arg(short, long, global = true, env = "REVGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wipe the graph store and rebuild it for one exercise
    Run(run::RunArgs),

    /// Show graph node and relationship counts
    Status,

    /// Similarity cache maintenance
    #[command(subcommand)]
    Cache(cache::CacheCommands),

    /// Relational store maintenance
    #[command(subcommand)]
    Db(db::DbCommands),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load(self.config.as_deref()).context("Failed to load settings")?;

        match self.command {
            Commands::Run(args) => run::execute(args, &settings).await,
            Commands::Status => status::execute(&settings).await,
            Commands::Cache(cmd) => cache::execute(cmd, &settings),
            Commands::Db(cmd) => db::execute(cmd, &settings),
        }
    }
}
