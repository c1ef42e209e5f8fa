//! Reviewer-centric aggregate queries.

use rusqlite::params;

use super::columns::query_columns;
use crate::pool::{DbPool, DbResult};

/// `(reviewer, product)` pairs, column-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewerProducts {
    pub reviewers: Vec<String>,
    pub asins: Vec<String>,
}

impl ReviewerProducts {
    pub fn len(&self) -> usize {
        self.reviewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviewers.is_empty()
    }

    /// Row view over the aligned columns.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reviewers
            .iter()
            .zip(&self.asins)
            .map(|(r, a)| (r.as_str(), a.as_str()))
    }
}

/// `(reviewer, type, count)` aggregates, column-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewerTypeCounts {
    pub reviewers: Vec<String>,
    pub types: Vec<String>,
    pub counts: Vec<i64>,
}

impl ReviewerTypeCounts {
    pub fn len(&self) -> usize {
        self.reviewers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviewers.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, i64)> {
        self.reviewers
            .iter()
            .zip(&self.types)
            .zip(&self.counts)
            .map(|((r, t), c)| (r.as_str(), t.as_str(), *c))
    }
}

/// Every review by the `limit` most prolific reviewers.
pub fn top_reviewer_products(pool: &DbPool, limit: u32) -> DbResult<ReviewerProducts> {
    let cols = query_columns(
        pool,
        "SELECT r.reviewerID, r.asin
         FROM review r
         INNER JOIN (SELECT reviewerID
                     FROM review
                     GROUP BY reviewerID
                     ORDER BY COUNT(*) DESC, reviewerID
                     LIMIT ?1) AS t ON r.reviewerID = t.reviewerID
         ORDER BY r.reviewerID, r.asin",
        params![limit],
    )?
    .require_rows("top reviewers")?;

    Ok(ReviewerProducts {
        reviewers: cols.text(0)?,
        asins: cols.text(1)?,
    })
}

/// Per-type review counts for reviewers who, among the first `window`
/// reviewers by name, reviewed more than one product type.
pub fn multi_type_reviewers(pool: &DbPool, window: u32) -> DbResult<ReviewerTypeCounts> {
    let cols = query_columns(
        pool,
        "SELECT reviewerID, type, COUNT(*)
         FROM review
         WHERE reviewerID IN (SELECT r2.reviewerID
                              FROM review r2
                              INNER JOIN (SELECT reviewerID
                                          FROM reviewer
                                          ORDER BY reviewerName
                                          LIMIT ?1) AS rev ON r2.reviewerID = rev.reviewerID
                              GROUP BY r2.reviewerID
                              HAVING COUNT(DISTINCT r2.type) > 1)
         GROUP BY reviewerID, type
         ORDER BY reviewerID, type",
        params![window],
    )?
    .require_rows("multi-type reviewers")?;

    Ok(ReviewerTypeCounts {
        reviewers: cols.text(0)?,
        types: cols.text(1)?,
        counts: cols.integer(2)?,
    })
}
