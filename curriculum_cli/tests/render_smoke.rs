//! Smoke tests for the text renderers and store preparation

use curriculum_cli::render::{render_gaps, render_report, render_trends, ALIGNED_MESSAGE};
use curriculum_cli::{market_trends, prepare_catalog};
use curriculum_core::store::{InMemoryStore, SqliteStore};
use curriculum_core::{AlignmentReport, AnalyzerConfig, Dataset, EntityKind, EntityStore};
use tempfile::TempDir;

fn sample_report() -> AlignmentReport {
    let mut store = InMemoryStore::new();
    let catalog = prepare_catalog(&mut store, &Dataset::sample()).unwrap();
    AlignmentReport::build(&catalog, &AnalyzerConfig::default())
}

#[test]
fn test_report_lists_every_course_and_suggestion() {
    let text = render_report(&sample_report());

    assert!(text.contains("Analyzing course: Introduction to Programming (CS101)"));
    assert!(text.contains("Analyzing course: Web and Database Systems (CS301)"));
    assert!(text.contains("- Software Development: 25.0%"));
    assert!(text.contains("- Web Developer: 66.7%"));
    assert!(text.contains("Consider adding the following skills to your curriculum:"));
    assert!(text.contains("- Machine Learning: Knowledge of ML algorithms"));
    assert!(!text.contains(ALIGNED_MESSAGE));
}

#[test]
fn test_fully_covered_curriculum_reports_alignment() {
    let dataset = Dataset::from_yaml_str(
        r#"
skills:
  - { id: A, name: Alpha }
standards:
  - { id: S1, name: Only Alpha, skills: [A] }
courses:
  - { id: C1, name: Alpha 101, skills: [A] }
"#,
    )
    .unwrap();
    let mut store = InMemoryStore::new();
    let catalog = prepare_catalog(&mut store, &dataset).unwrap();
    let report = AlignmentReport::build(&catalog, &AnalyzerConfig { precision: 0 });

    let text = render_report(&report);
    assert!(text.contains("- Only Alpha: 100%"));
    assert!(text.contains(ALIGNED_MESSAGE));
    assert_eq!(render_gaps(&report.gaps), "Curriculum Gaps: none\n");
}

#[test]
fn test_gap_lines() {
    let text = render_gaps(&sample_report().gaps);
    assert!(text.starts_with("Curriculum Gaps:\n"));
    assert!(text.contains("- Missing skills for standard Cloud Architecture (STD3): Cybersecurity, DevOps"));
    assert!(text.contains("- Missing skills for job Data Analyst (JOB2): Big Data, Machine Learning"));
}

#[test]
fn test_trends_rank_postings_and_requirements_separately() {
    let mut store = InMemoryStore::new();
    let catalog = prepare_catalog(&mut store, &Dataset::sample()).unwrap();
    let trends = market_trends(&catalog, 3);

    assert_eq!(trends.postings[0].skill, "python");
    assert_eq!(trends.postings[0].count, 4);
    assert_eq!(trends.postings[1].skill, "git");

    // every stored requirement needs Python Programming
    assert_eq!(trends.requirements[0].skill, "python programming");
    assert_eq!(trends.requirements[0].count, 7);
    assert_eq!(trends.requirements[1].skill, "cloud computing");
    assert_eq!(trends.requirements[1].count, 4);
    assert_eq!(trends.requirements[2].skill, "database design");
    assert!(trends.postings.iter().all(|d| d.skill != "python programming"));

    let text = render_trends(&trends);
    assert!(text.starts_with("Job Market Trends (Top 3 skills):\n"));
    assert!(text.contains("Stored Job Requirements (Top 3 skills):\n"));
}

#[test]
fn test_invalid_dataset_fails_preparation() {
    let dataset = Dataset::from_yaml_str(
        r#"
courses:
  - { id: C1, name: Ghost course, skills: [NOPE] }
"#,
    )
    .unwrap();
    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::open(dir.path().join("bad.db")).unwrap();

    let err = prepare_catalog(&mut store, &dataset).unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("Failed to seed the entity store"));
    assert!(chain.contains("course 'C1' references unknown skill 'NOPE'"));
}

#[test]
fn test_rejected_dataset_leaves_persistent_store_usable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("curriculum.db");
    let bad = Dataset::from_yaml_str("courses:\n  - { id: C1, name: Ghost, skills: [NOPE] }\n").unwrap();

    {
        let mut store = SqliteStore::open(&path).unwrap();
        assert!(prepare_catalog(&mut store, &bad).is_err());
    }

    let mut store = SqliteStore::open(&path).unwrap();
    assert!(!store.contains(EntityKind::Course, "C1").unwrap());
    let catalog = prepare_catalog(&mut store, &Dataset::sample()).unwrap();
    assert_eq!(catalog.courses().len(), 3);
}

#[test]
fn test_catalog_is_scoped_to_the_seeded_dataset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("curriculum.db");
    let own = Dataset::from_yaml_str(
        r#"
skills:
  - { id: RS, name: Rust }
requirements:
  - { id: JOB-RS, title: Rust Developer, skills: [RS] }
courses:
  - { id: MY1, name: Rust 101, skills: [RS] }
"#,
    )
    .unwrap();

    let mut store = SqliteStore::open(&path).unwrap();
    prepare_catalog(&mut store, &Dataset::sample()).unwrap();
    let catalog = prepare_catalog(&mut store, &own).unwrap();

    let ids: Vec<&str> = catalog.courses().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["MY1"]);
    assert!(catalog.standards().is_empty());

    let report = AlignmentReport::build(&catalog, &AnalyzerConfig::default());
    assert!(report.is_aligned());

    // the sample is still there for the next default run
    let sample = prepare_catalog(&mut store, &Dataset::sample()).unwrap();
    assert_eq!(sample.courses().len(), 3);
}

#[test]
fn test_edited_record_is_reported_not_reused() {
    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::open(dir.path().join("curriculum.db")).unwrap();
    prepare_catalog(&mut store, &Dataset::sample()).unwrap();

    let mut edited = Dataset::sample();
    edited.standards[0] = edited.standards[0].clone().with_skills(["SKILL1"]);

    let chain = format!("{:#}", prepare_catalog(&mut store, &edited).unwrap_err());
    assert!(chain.contains("differ from the dataset"));
    assert!(chain.contains("industry_standard:STD1"));
}
