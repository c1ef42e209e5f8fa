//! In-memory review store fixtures.

use rusqlite::params;

use crate::migrations::run_migrations;
use crate::pool::{DbPool, DbResult};

/// Empty in-memory database with the review schema applied.
pub fn empty_pool() -> DbResult<DbPool> {
    let pool = DbPool::in_memory()?;
    run_migrations(&pool)?;
    Ok(pool)
}

/// One review row; reviewer and product rows are created on demand.
#[derive(Debug, Clone)]
pub struct ReviewFixture<'a> {
    pub reviewer: &'a str,
    pub asin: &'a str,
    pub product_type: &'a str,
    pub overall: i64,
    pub review_time: &'a str,
}

impl<'a> ReviewFixture<'a> {
    pub fn new(reviewer: &'a str, asin: &'a str, product_type: &'a str) -> Self {
        Self {
            reviewer,
            asin,
            product_type,
            overall: 5,
            review_time: "01 1, 2014",
        }
    }

    pub fn rated(mut self, overall: i64, review_time: &'a str) -> Self {
        self.overall = overall;
        self.review_time = review_time;
        self
    }
}

/// Insert reviews, creating any missing reviewer (named after its id) and
/// product rows.
pub fn insert_reviews(pool: &DbPool, reviews: &[ReviewFixture<'_>]) -> DbResult<()> {
    pool.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        for review in reviews {
            tx.execute(
                "INSERT OR IGNORE INTO reviewer (reviewerID, reviewerName) VALUES (?1, ?1)",
                params![review.reviewer],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO product (asin, type) VALUES (?1, ?2)",
                params![review.asin, review.product_type],
            )?;
            tx.execute(
                "INSERT INTO review (reviewerID, asin, type, overall, unixReviewTime, reviewTime)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                params![
                    review.reviewer,
                    review.asin,
                    review.product_type,
                    review.overall,
                    review.review_time
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    })
}

/// Insert a product with no reviews.
pub fn insert_product(pool: &DbPool, asin: &str, product_type: &str) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT OR IGNORE INTO product (asin, type) VALUES (?1, ?2)",
            params![asin, product_type],
        )?;
        Ok(())
    })
}

/// Schema plus `reviews`.
pub fn seeded_pool(reviews: &[ReviewFixture<'_>]) -> DbResult<DbPool> {
    let pool = empty_pool()?;
    insert_reviews(&pool, reviews)?;
    Ok(pool)
}
