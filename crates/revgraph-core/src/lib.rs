//! Revgraph Core Library
//!
//! Settings, the error taxonomy, and the Jaccard similarity engine shared by
//! the relational and graph crates.

pub mod config;
pub mod error;
pub mod similarity;

pub use config::Settings;
pub use error::{RevgraphError, RevgraphResult};
pub use similarity::{SimilarityCache, SimilarityMatrix, UserProducts, jaccard};
