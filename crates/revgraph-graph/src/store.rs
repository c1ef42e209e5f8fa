//! The graph store seam used by the orchestrator.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::statement::Statement;

/// One result record as a plain field-to-value mapping.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Removes every node and relationship.
pub const WIPE: &str = "MATCH (n) DETACH DELETE n";

/// Diagnostic read over all nodes, grouped by label.
pub const VERIFY: &str = "MATCH (n)
 RETURN labels(n)[0] AS label, count(n) AS nodes
 ORDER BY label";

/// Node and relationship counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}

impl GraphCounts {
    pub fn is_empty(&self) -> bool {
        self.nodes == 0 && self.relationships == 0
    }
}

/// Statement executor over a graph database.
///
/// Every call is its own session: acquire, run one statement, collect, release.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Run one statement and collect its records.
    async fn run(&self, statement: &Statement) -> Result<Vec<Record>>;

    /// Current node and relationship counts.
    async fn counts(&self) -> Result<GraphCounts>;
}
