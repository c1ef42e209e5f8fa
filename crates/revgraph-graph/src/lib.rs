//! # Revgraph Graph
//!
//! Rebuilds a Neo4j property graph from the relational review store.
//!
//! Each [`Exercise`] pulls aggregates from SQLite, optionally runs the
//! similarity engine, and hands back a bulk CREATE statement. The
//! [`Orchestrator`] wraps that with a fixed protocol: wipe the store, check
//! it is empty, load, verify, then run any follow-up statement.

pub mod builders;
pub mod client;
pub mod exercises;
pub mod pipeline;
pub mod statement;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use client::GraphClient;
pub use exercises::{Exercise, ExercisePlan, MultiTypeReviewers, PopularCoReviewers, RandomSampleReviews, ReviewerSimilarity};
pub use pipeline::{Orchestrator, RunReport};
pub use statement::{Alias, GraphStatement, NodeKind, ParamValue, Statement};
pub use store::{GraphCounts, GraphStore, Record};
