//! Exercise run command.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use dialoguer::Input;
use tracing::{debug, info};

use revgraph_core::{Settings, SimilarityCache};
use revgraph_db::DbPool;
use revgraph_graph::{
    Exercise, GraphClient, MultiTypeReviewers, Orchestrator, PopularCoReviewers,
    RandomSampleReviews, ReviewerSimilarity,
};

use crate::output;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExerciseArg {
    /// Jaccard similarity between the most active reviewers
    Similarity,
    /// Reviews of randomly sampled products
    RandomSample,
    /// Reviewers of more than one product type
    MultiType,
    /// Co-reviewers of popular products under the review threshold
    CoReviewers,
}

#[derive(Args)]
pub struct RunArgs {
    /// Which graph to build
    #[arg(value_enum)]
    pub exercise: ExerciseArg,

    /// Products to sample (random-sample only; prompts when omitted)
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Seed for the product sample
    #[arg(long)]
    pub seed: Option<u64>,

    /// Build and print the statement without touching the graph store
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: RunArgs, settings: &Settings) -> Result<()> {
    let db = DbPool::open(&settings.database)
        .with_context(|| format!("Failed to open review database {}", settings.database.display()))?;

    debug!(database = %settings.database.display(), "Opened review database");

    let exercise = build_exercise(&args, settings)?;

    if args.dry_run {
        let plan = exercise.prepare(&db)?;
        info!(
            exercise = exercise.name(),
            nodes = plan.declared.nodes,
            relationships = plan.declared.relationships,
            "Dry run, graph store untouched"
        );
        output::print_plan(exercise.name(), &plan);
        return Ok(());
    }

    let client = GraphClient::connect(&settings.graph).await?;
    let orchestrator = Orchestrator::new(client);

    if !args.json {
        println!("{} {}", "Rebuilding graph:".bold(), exercise.name().cyan());
    }
    let report = orchestrator.run(&db, exercise.as_ref()).await?;
    info!(
        exercise = report.exercise,
        nodes = report.loaded.nodes,
        relationships = report.loaded.relationships,
        "Run complete"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report);
    }

    Ok(())
}

fn build_exercise(args: &RunArgs, settings: &Settings) -> Result<Box<dyn Exercise>> {
    let exercise: Box<dyn Exercise> = match args.exercise {
        ExerciseArg::Similarity => Box::new(ReviewerSimilarity {
            top_reviewers: settings.similarity.top_reviewers,
            cache: SimilarityCache::new(&settings.cache_dir),
        }),
        ExerciseArg::RandomSample => {
            let sample_size = match args.sample_size {
                Some(n) if n > 0 => n,
                Some(_) => anyhow::bail!("--sample-size must be a positive integer"),
                None => prompt_sample_size()?,
            };
            debug!(sample_size, seed = ?args.seed, "Sampling products");
            Box::new(RandomSampleReviews { sample_size, seed: args.seed })
        }
        ExerciseArg::MultiType => Box::new(MultiTypeReviewers {
            reviewer_window: settings.multi_type.reviewer_window,
        }),
        ExerciseArg::CoReviewers => Box::new(PopularCoReviewers {
            max_reviews: settings.popular.max_reviews,
            top_products: settings.popular.top_products,
        }),
    };
    Ok(exercise)
}

/// Ask until the operator enters a positive integer.
fn prompt_sample_size() -> Result<usize> {
    let n: usize = Input::new()
        .with_prompt("Number of products to sample")
        .validate_with(|n: &usize| -> Result<(), &'static str> {
            if *n > 0 {
                Ok(())
            } else {
                Err("enter a positive integer")
            }
        })
        .interact_text()
        .context("Failed to read sample size")?;
    Ok(n)
}
