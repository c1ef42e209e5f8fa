//! The four graph exercises.
//!
//! An exercise queries the relational store, runs whatever computation its
//! graph needs, and returns an [`ExercisePlan`]: the bulk CREATE to load and
//! an optional statement to run against the loaded graph.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use revgraph_core::{RevgraphError, SimilarityCache, UserProducts};
use revgraph_db::queries::{products, reviewers};
use revgraph_db::DbPool;

use crate::builders::{
    co_review_statement, multi_type_statement, random_sample_statement, similarity_statement,
    CO_REVIEW_LINKS, MOST_SIMILAR_NEIGHBOURS,
};
use crate::statement::{GraphStatement, Statement};
use crate::store::GraphCounts;

/// What an exercise wants executed.
#[derive(Debug, Clone)]
pub struct ExercisePlan {
    pub load: Statement,
    /// Declarations in `load`.
    pub declared: GraphCounts,
    pub follow_up: Option<Statement>,
}

impl ExercisePlan {
    pub fn new(graph: &GraphStatement, follow_up: Option<Statement>) -> Result<Self> {
        Ok(Self {
            load: graph.render()?,
            declared: GraphCounts {
                nodes: graph.node_count(),
                relationships: graph.relationship_count(),
            },
            follow_up,
        })
    }
}

/// One graph-building scenario.
pub trait Exercise: Send + Sync {
    fn name(&self) -> &'static str;

    /// Build the statements for this exercise from the relational store.
    fn prepare(&self, db: &DbPool) -> Result<ExercisePlan>;
}

/// Exercise 1: Jaccard similarity between the most active reviewers.
#[derive(Debug, Clone)]
pub struct ReviewerSimilarity {
    pub top_reviewers: u32,
    pub cache: SimilarityCache,
}

impl Exercise for ReviewerSimilarity {
    fn name(&self) -> &'static str {
        "similarity"
    }

    fn prepare(&self, db: &DbPool) -> Result<ExercisePlan> {
        let rows = reviewers::top_reviewer_products(db, self.top_reviewers)
            .context("Failed to load top reviewers")?;

        let input = UserProducts::from_pairs(rows.pairs());
        let users = input.users();
        info!(reviewers = users.len(), reviews = rows.len(), "Loaded reviewer products");

        let matrix = self.cache.load_or_compute(&input, &users)?;
        let graph = similarity_statement(&matrix);

        ExercisePlan::new(&graph, Some(Statement::new(MOST_SIMILAR_NEIGHBOURS)))
    }
}

/// Exercise 2: reviews of a random sample of products.
#[derive(Debug, Clone)]
pub struct RandomSampleReviews {
    pub sample_size: usize,
    /// Fixed seed for reproducible samples.
    pub seed: Option<u64>,
}

impl RandomSampleReviews {
    fn sample(&self, population: &[String]) -> Result<Vec<String>, RevgraphError> {
        if self.sample_size == 0 || self.sample_size > population.len() {
            return Err(RevgraphError::InvalidSampleSize {
                requested: self.sample_size,
                available: population.len(),
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut chosen: Vec<String> = population
            .choose_multiple(&mut rng, self.sample_size)
            .cloned()
            .collect();
        chosen.sort();
        Ok(chosen)
    }
}

impl Exercise for RandomSampleReviews {
    fn name(&self) -> &'static str {
        "random-sample"
    }

    fn prepare(&self, db: &DbPool) -> Result<ExercisePlan> {
        let asins = products::all_asins(db).context("Failed to list products")?;
        let sampled = self.sample(&asins)?;
        info!(sampled = sampled.len(), population = asins.len(), "Sampled products");

        let reviews = products::review_details(db, &sampled)
            .context("Failed to load reviews of sampled products")?;
        let graph = random_sample_statement(&sampled, &reviews);

        ExercisePlan::new(&graph, None)
    }
}

/// Exercise 3: reviewers who reviewed more than one product type.
#[derive(Debug, Clone)]
pub struct MultiTypeReviewers {
    pub reviewer_window: u32,
}

impl Exercise for MultiTypeReviewers {
    fn name(&self) -> &'static str {
        "multi-type"
    }

    fn prepare(&self, db: &DbPool) -> Result<ExercisePlan> {
        let counts = reviewers::multi_type_reviewers(db, self.reviewer_window)
            .context("Failed to load multi-type reviewers")?;
        info!(rows = counts.len(), "Loaded reviewer type counts");

        ExercisePlan::new(&multi_type_statement(&counts), None)
    }
}

/// Exercise 4: co-reviewers of popular products under a review threshold.
#[derive(Debug, Clone)]
pub struct PopularCoReviewers {
    pub max_reviews: u32,
    pub top_products: u32,
}

impl Exercise for PopularCoReviewers {
    fn name(&self) -> &'static str {
        "co-reviewers"
    }

    fn prepare(&self, db: &DbPool) -> Result<ExercisePlan> {
        let pairs = products::popular_product_reviewers(db, self.max_reviews, self.top_products)
            .context("Failed to load popular products")?;
        info!(reviews = pairs.len(), "Loaded popular product reviewers");

        ExercisePlan::new(&co_review_statement(&pairs), Some(Statement::new(CO_REVIEW_LINKS)))
    }
}
