//! Graph status command.

use anyhow::Result;
use colored::Colorize;

use revgraph_core::Settings;
use revgraph_graph::{GraphClient, GraphStore};

pub async fn execute(settings: &Settings) -> Result<()> {
    let client = GraphClient::connect(&settings.graph).await?;
    let counts = client.counts().await?;

    println!("{}", "Graph Status".bold());
    println!("{}", "─".repeat(40));
    println!("  Store:         {}", settings.graph.uri.dimmed());
    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());
    println!("{}", "─".repeat(40));

    Ok(())
}
