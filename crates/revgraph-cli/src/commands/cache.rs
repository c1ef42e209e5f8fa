//! Similarity cache commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use tracing::debug;

use revgraph_core::{Settings, SimilarityCache};

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Delete every cached similarity matrix
    Clear,

    /// Show where cached matrices live
    Path,
}

pub fn execute(cmd: CacheCommands, settings: &Settings) -> Result<()> {
    let cache = SimilarityCache::new(&settings.cache_dir);
    debug!(dir = %cache.dir().display(), "Using similarity cache");

    match cmd {
        CacheCommands::Clear => {
            let removed = cache.clear()?;
            println!("{} Removed {} cached matri{}", "✓".green().bold(), removed, if removed == 1 { "x" } else { "ces" });
        }
        CacheCommands::Path => println!("{}", cache.dir().display()),
    }

    Ok(())
}
