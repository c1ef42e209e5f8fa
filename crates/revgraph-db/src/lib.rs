//! Revgraph Database Layer
//!
//! Read-only access to the relational review store (SQLite). Every query
//! returns its rows transposed into column-major form.

pub mod migrations;
pub mod pool;
pub mod queries;

#[cfg(any(test, feature = "test-utils"))]
pub mod testutil;

pub use pool::{DbError, DbPool, DbResult};
pub use queries::columns::{Column, Columns, query_columns};
