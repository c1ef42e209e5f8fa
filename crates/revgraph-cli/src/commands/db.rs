//! Relational store commands.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use tracing::info;

use revgraph_core::Settings;
use revgraph_db::{migrations, DbPool};

#[derive(Subcommand)]
pub enum DbCommands {
    /// Create the review tables in an empty database
    Init,
}

pub fn execute(cmd: DbCommands, settings: &Settings) -> Result<()> {
    match cmd {
        DbCommands::Init => {
            let pool = DbPool::create(&settings.database)
                .with_context(|| format!("Failed to open {}", settings.database.display()))?;
            migrations::run_migrations(&pool)?;
            info!(database = %settings.database.display(), "Applied review schema");
            println!(
                "{} Review schema ready in {}",
                "✓".green().bold(),
                settings.database.display().to_string().cyan()
            );
        }
    }

    Ok(())
}
