//! Pure statement builders, one per exercise.
//!
//! Each builder declares every node it needs from the same query result it
//! draws relationships from, then renders one bulk CREATE.

pub mod co_review;
pub mod multi_type;
pub mod random_sample;
pub mod similarity;

pub use co_review::{co_review_statement, CO_REVIEW_LINKS};
pub use multi_type::multi_type_statement;
pub use random_sample::random_sample_statement;
pub use similarity::{similarity_statement, MOST_SIMILAR_NEIGHBOURS, ZERO_SIMILARITY};

/// Relationship type from a reviewer to what they reviewed.
pub const REVIEWS: &str = "REVIEWS";
