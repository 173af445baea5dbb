//! Curriculum Mapper Core
//!
//! Maps course content to industry standards and job requirements:
//! - Entity store (SQLite or in-memory) for skills, standards, requirements,
//!   learning objectives and courses
//! - Catalog loading with referential-integrity checks
//! - Coverage analysis and curriculum gap detection
//! - Offline job-market skill trends

pub mod catalog;
pub mod config;
pub mod coverage;
pub mod dataset;
pub mod market;
pub mod report;
pub mod store;
pub mod types;

pub use catalog::{Catalog, CatalogError, MalformedReference};
pub use config::{AppConfig, ConfigError, StoreLocation};
pub use coverage::{
    course_gaps, coverage_percent, identify_curriculum_gaps, matched_targets, round_to,
    suggest_curriculum_improvements, AnalyzerConfig, CoverageAnalyzer, SkillTarget, TargetGap,
};
pub use dataset::{seed, Dataset, DatasetError, SeedSummary};
pub use report::AlignmentReport;
pub use store::{EntityKey, EntityStore, InMemoryStore, SqliteStore, StoreError};
pub use types::*;
