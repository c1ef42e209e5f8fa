//! Product-centric aggregate queries.

use rusqlite::{params, params_from_iter};

use super::columns::query_columns;
use super::reviewers::ReviewerProducts;
use crate::pool::{DbPool, DbResult};

/// Review detail rows, column-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDetails {
    pub asins: Vec<String>,
    pub reviewers: Vec<String>,
    pub times: Vec<String>,
    pub ratings: Vec<i64>,
}

impl ReviewDetails {
    pub fn len(&self) -> usize {
        self.asins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asins.is_empty()
    }

    /// `(asin, reviewer, time, rating)` per review.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str, &str, i64)> {
        self.asins
            .iter()
            .zip(&self.reviewers)
            .zip(&self.times)
            .zip(&self.ratings)
            .map(|(((a, r), t), o)| (a.as_str(), r.as_str(), t.as_str(), *o))
    }
}

/// Every distinct product id.
pub fn all_asins(pool: &DbPool) -> DbResult<Vec<String>> {
    query_columns(pool, "SELECT DISTINCT asin FROM product ORDER BY asin", [])?
        .require_rows("product ids")?
        .text(0)
}

/// Time and rating of every review of the given products.
pub fn review_details(pool: &DbPool, asins: &[String]) -> DbResult<ReviewDetails> {
    let placeholders = vec!["?"; asins.len()].join(", ");
    let sql = format!(
        "SELECT asin, reviewerID, reviewTime, overall
         FROM review
         WHERE asin IN ({placeholders})
         ORDER BY asin, reviewerID"
    );

    let cols = query_columns(pool, &sql, params_from_iter(asins.iter()))?
        .require_rows("reviews of sampled products")?;

    Ok(ReviewDetails {
        asins: cols.text(0)?,
        reviewers: cols.text(1)?,
        times: cols.text(2)?,
        ratings: cols.integer(3)?,
    })
}

/// Reviewers of the `top` most reviewed products that still have fewer
/// than `max_reviews` reviews each.
pub fn popular_product_reviewers(
    pool: &DbPool,
    max_reviews: u32,
    top: u32,
) -> DbResult<ReviewerProducts> {
    let cols = query_columns(
        pool,
        "SELECT r.reviewerID, r.asin
         FROM review r
         INNER JOIN (SELECT asin
                     FROM review
                     GROUP BY asin
                     HAVING COUNT(*) < ?1
                     ORDER BY COUNT(*) DESC, asin
                     LIMIT ?2) AS r2 ON r.asin = r2.asin
         ORDER BY r.reviewerID, r.asin",
        params![max_reviews, top],
    )?
    .require_rows("popular products")?;

    Ok(ReviewerProducts {
        reviewers: cols.text(0)?,
        asins: cols.text(1)?,
    })
}
