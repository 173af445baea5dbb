//! Curriculum Mapper CLI library
//!
//! Argument handling, store preparation and text rendering shared by the
//! binary and its tests.

pub mod cli;
pub mod render;

pub use cli::{Cli, Commands};

use anyhow::{Context, Result};
use curriculum_core::market::{analyze_job_market_trends, sample_postings, JobPosting, SkillDemand};
use curriculum_core::{seed, store, AlignmentReport, AppConfig, Catalog, Dataset, EntityStore};

/// Seeds the store with `dataset` and loads a validated catalog of exactly
/// the dataset's entities.
///
/// The dataset is checked before anything is written, so a malformed file
/// leaves the store untouched. Records left by other datasets are not part
/// of the catalog.
pub fn prepare_catalog(store: &mut dyn EntityStore, dataset: &Dataset) -> Result<Catalog> {
    let summary = seed(&mut *store, dataset).context("Failed to seed the entity store")?;
    log::info!(
        "Seeded store: {} inserted, {} already present",
        summary.inserted,
        summary.skipped
    );
    Catalog::load_keys(&*store, dataset.keys()).context("Stored data failed validation")
}

/// Skill demand from the simulated postings and from the stored requirements.
///
/// Postings name skills by keyword and requirements by catalog name, so the
/// two are ranked separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketTrends {
    pub postings: Vec<SkillDemand>,
    pub requirements: Vec<SkillDemand>,
}

pub fn market_trends(catalog: &Catalog, limit: usize) -> MarketTrends {
    let stored: Vec<JobPosting> = catalog
        .requirements()
        .iter()
        .map(|r| JobPosting::from_requirement(r, catalog))
        .collect();

    MarketTrends {
        postings: analyze_job_market_trends(&sample_postings(), limit),
        requirements: analyze_job_market_trends(&stored, limit),
    }
}

/// Runs one invocation and returns what it prints
pub fn run(cli: &Cli, mut config: AppConfig) -> Result<String> {
    cli.apply(&mut config);

    let dataset = match &cli.data {
        Some(path) => Dataset::load_yaml(path)
            .with_context(|| format!("Failed to load dataset {}", path.display()))?,
        None => Dataset::sample(),
    };

    let mut store = store::open(&config.store).context("Failed to open the entity store")?;
    let catalog = prepare_catalog(store.as_mut(), &dataset)?;

    let output = match cli.command() {
        Commands::Report { json: true } => {
            let report = AlignmentReport::build(&catalog, &config.analyzer);
            let mut json = report.to_json().context("Failed to serialize the report")?;
            json.push('\n');
            json
        }
        Commands::Report { json: false } => {
            render::render_report(&AlignmentReport::build(&catalog, &config.analyzer))
        }
        Commands::Gaps => {
            render::render_gaps(&AlignmentReport::build(&catalog, &config.analyzer).gaps)
        }
        Commands::Trends { limit } => {
            render::render_trends(&market_trends(&catalog, limit.unwrap_or(config.trend_limit)))
        }
    };
    Ok(output)
}
