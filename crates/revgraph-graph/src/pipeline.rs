//! Reset, build, load and verify, around any [`Exercise`].
//!
//! The graph store is wholly owned by one run: it is wiped before every
//! build regardless of what an earlier run (of any exercise) left behind.
//! A failure after the wipe leaves the store empty or partially loaded; the
//! remedy is to run again.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use revgraph_db::DbPool;

use crate::exercises::Exercise;
use crate::statement::Statement;
use crate::store::{GraphCounts, GraphStore, Record, VERIFY, WIPE};

/// Outcome of one exercise run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub exercise: &'static str,
    /// Counts right after the wipe. Should be zero.
    pub after_reset: GraphCounts,
    /// Declarations in the bulk statement.
    pub declared: GraphCounts,
    /// Counts after loading, before any follow-up.
    pub loaded: GraphCounts,
    /// Per-label node counts read back after loading.
    pub verification: Vec<Record>,
    pub follow_up: Option<Vec<Record>>,
}

/// Runs exercises against a graph store.
pub struct Orchestrator<S> {
    store: S,
}

impl<S: GraphStore> Orchestrator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Wipe the store and confirm it is empty.
    pub async fn reset(&self) -> Result<GraphCounts> {
        self.store
            .run(&Statement::new(WIPE))
            .await
            .context("Failed to wipe graph store")?;

        let counts = self.store.counts().await?;
        if counts.is_empty() {
            info!("Graph store is empty");
        } else {
            warn!(nodes = counts.nodes, relationships = counts.relationships, "Graph store not empty after wipe");
        }
        Ok(counts)
    }

    /// Full protocol: reset, build, load, verify, follow-up.
    pub async fn run(&self, db: &DbPool, exercise: &dyn Exercise) -> Result<RunReport> {
        let name = exercise.name();
        info!(exercise = name, "Starting graph rebuild");

        let after_reset = self.reset().await?;

        let plan = exercise
            .prepare(db)
            .with_context(|| format!("Failed to build statements for '{}'", name))?;
        info!(
            nodes = plan.declared.nodes,
            relationships = plan.declared.relationships,
            "Statement built"
        );

        self.store
            .run(&plan.load)
            .await
            .with_context(|| format!("Failed to load graph for '{}'", name))?;

        let verification = self
            .store
            .run(&Statement::new(VERIFY))
            .await
            .context("Failed to read back loaded graph")?;
        let loaded = self.store.counts().await?;
        info!(nodes = loaded.nodes, relationships = loaded.relationships, "Graph loaded");
        if loaded != plan.declared {
            warn!(
                declared_nodes = plan.declared.nodes,
                declared_relationships = plan.declared.relationships,
                "Loaded counts differ from the built statement"
            );
        }

        let follow_up = match &plan.follow_up {
            Some(statement) => {
                let records = self
                    .store
                    .run(statement)
                    .await
                    .with_context(|| format!("Follow-up statement for '{}' failed", name))?;
                info!(records = records.len(), "Follow-up complete");
                Some(records)
            }
            None => None,
        };

        Ok(RunReport {
            exercise: name,
            after_reset,
            declared: plan.declared,
            loaded,
            verification,
            follow_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::{ExercisePlan, MultiTypeReviewers, PopularCoReviewers};
    use crate::testutil::FakeStore;
    use revgraph_db::testutil::{seeded_pool, ReviewFixture as R};

    fn pool() -> DbPool {
        seeded_pool(&[
            R::new("A", "p1", "x"),
            R::new("A", "p2", "x"),
            R::new("A", "p3", "x"),
            R::new("A", "p4", "y"),
            R::new("B", "p1", "x"),
            R::new("B", "p5", "y"),
        ])
        .unwrap()
    }

    struct Broken;

    impl Exercise for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn prepare(&self, _db: &DbPool) -> Result<ExercisePlan> {
            anyhow::bail!("no data")
        }
    }

    #[tokio::test]
    async fn test_protocol_order() {
        let orchestrator = Orchestrator::new(FakeStore::new());
        let report = orchestrator
            .run(&pool(), &PopularCoReviewers { max_reviews: 40, top_products: 5 })
            .await
            .unwrap();

        let executed = orchestrator.store().executed();
        assert_eq!(executed.len(), 4);
        assert_eq!(executed[0], WIPE);
        assert!(executed[1].starts_with("CREATE\n"));
        assert_eq!(executed[2], VERIFY);
        assert!(executed[3].contains("MERGE (u1)-[l:LINK"));
        assert_eq!(report.follow_up.map(|r| r.len()), Some(1));
    }

    #[tokio::test]
    async fn test_loaded_counts_match_declarations() {
        let orchestrator = Orchestrator::new(FakeStore::new());
        let report = orchestrator
            .run(&pool(), &MultiTypeReviewers { reviewer_window: 400 })
            .await
            .unwrap();

        assert!(report.after_reset.is_empty());
        assert_eq!(report.loaded, report.declared);
        assert_eq!(report.loaded, GraphCounts { nodes: 4, relationships: 4 });
        assert_eq!(report.verification.len(), 2);
        assert!(report.follow_up.is_none());
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let orchestrator = Orchestrator::new(FakeStore::with_leftovers(17, 9));
        let db = pool();
        let exercise = MultiTypeReviewers { reviewer_window: 400 };

        let first = orchestrator.run(&db, &exercise).await.unwrap();
        let second = orchestrator.run(&db, &exercise).await.unwrap();

        assert_eq!(first.loaded, second.loaded);
        assert_eq!(orchestrator.store().counts().await.unwrap(), second.loaded);
    }

    #[tokio::test]
    async fn test_build_failure_leaves_store_empty() {
        let orchestrator = Orchestrator::new(FakeStore::with_leftovers(3, 1));
        let err = orchestrator.run(&pool(), &Broken).await.unwrap_err();

        assert!(format!("{:#}", err).contains("no data"));
        assert!(orchestrator.store().counts().await.unwrap().is_empty());
        assert_eq!(orchestrator.store().executed(), vec![WIPE.to_string()]);
    }

    #[tokio::test]
    async fn test_load_failure_aborts_before_follow_up() {
        let orchestrator = Orchestrator::new(FakeStore::failing_on("CREATE\n"));
        let result = orchestrator
            .run(&pool(), &PopularCoReviewers { max_reviews: 40, top_products: 5 })
            .await;

        assert!(result.is_err());
        assert!(orchestrator.store().executed().iter().all(|s| !s.contains("LINK")));
    }
}
