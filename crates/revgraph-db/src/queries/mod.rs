//! Aggregate queries backing the four graph exercises.

pub mod columns;
pub mod products;
pub mod reviewers;
