//! Reviewers of popular-but-niche products:
//! `(:REVIEWER)-[:REVIEWS]->(:PRODUCT)`, plus server-side `LINK` edges
//! between reviewers that share products.

use revgraph_db::queries::reviewers::ReviewerProducts;
use tracing::debug;

use super::REVIEWS;
use crate::statement::{GraphStatement, NodeKind};

/// Counts products shared by each ordered reviewer pair and merges a
/// `LINK {n_common_prods}` edge for it.
pub const CO_REVIEW_LINKS: &str = "MATCH (u1:REVIEWER)-[:REVIEWS]->(p:PRODUCT)<-[:REVIEWS]-(u2:REVIEWER)
 WHERE u1 <> u2
 WITH u1, u2, count(p) AS num_common
 MERGE (u1)-[l:LINK {n_common_prods: num_common}]->(u2)
 RETURN count(l) AS links";

pub fn co_review_statement(pairs: &ReviewerProducts) -> GraphStatement {
    let mut g = GraphStatement::new();

    for reviewer in &pairs.reviewers {
        g.node(NodeKind::Reviewer, reviewer);
    }
    for asin in &pairs.asins {
        g.node(NodeKind::Product, asin);
    }

    for (reviewer, asin) in pairs.pairs() {
        let from = g.node(NodeKind::Reviewer, reviewer);
        let to = g.node(NodeKind::Product, asin);
        g.relate(&from, REVIEWS, &to, vec![]);
    }

    debug!(nodes = g.node_count(), edges = g.relationship_count(), "Built co-review statement");
    g
}
