//! End-to-end: seed a store, load the catalog, analyse coverage

use curriculum_core::coverage::target_entries;
use curriculum_core::store::{EntityStore, InMemoryStore, SqliteStore};
use curriculum_core::types::{skill_set, CourseId, JobRequirement, RequirementId, StandardId};
use curriculum_core::{
    seed, suggest_curriculum_improvements, AlignmentReport, AnalyzerConfig, Catalog, CatalogError,
    CoverageAnalyzer, Dataset,
};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn sample_catalog() -> Catalog {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut store = SqliteStore::in_memory().unwrap();
    seed(&mut store, &Dataset::sample()).unwrap();
    Catalog::load(&store).unwrap()
}

#[test]
fn test_sample_course_coverage() {
    let catalog = sample_catalog();
    let analyzer = CoverageAnalyzer::default();

    let intro = catalog
        .courses()
        .iter()
        .find(|c| c.id == CourseId::from("CS101"))
        .unwrap();
    let skills = catalog.course_skills(intro);
    assert_eq!(skills, skill_set(["SKILL1"]));

    let standards = analyzer.map_course_to(&skills, catalog.standards());
    assert_eq!(standards[&StandardId::from("STD1")], 25.0);
    assert_eq!(standards[&StandardId::from("STD3")], 0.0);
    assert_eq!(standards[&StandardId::from("STD5")], 33.3);

    let web = catalog
        .courses()
        .iter()
        .find(|c| c.id == CourseId::from("CS301"))
        .unwrap();
    let skills = catalog.course_skills(web);
    let requirements = analyzer.map_course_to(&skills, catalog.requirements());
    assert_eq!(requirements[&RequirementId::from("JOB4")], 66.7);
    assert_eq!(requirements[&RequirementId::from("JOB7")], 60.0);
}

#[test]
fn test_sample_suggestions() {
    let catalog = sample_catalog();
    let missing =
        suggest_curriculum_improvements(&catalog.all_course_skills(), catalog.all_target_skills());
    assert_eq!(
        missing,
        skill_set(["SKILL10", "SKILL3", "SKILL7", "SKILL8", "SKILL9"])
    );

    let report = AlignmentReport::build(&catalog, &AnalyzerConfig::default());
    let names: Vec<&str> = report
        .suggested_skills
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["Big Data", "Machine Learning", "Cybersecurity", "Agile Methodologies", "DevOps"]
    );
}

#[test]
fn test_two_courses_one_requirement() {
    let mut store = InMemoryStore::new();
    let dataset = Dataset::from_yaml_str(
        r#"
skills:
  - { id: Python, name: Python }
  - { id: SQL, name: SQL }
  - { id: Excel, name: Excel }
requirements:
  - { id: JOB1, title: Analyst, skills: [Python, SQL, Excel] }
courses:
  - { id: C1, name: Python, skills: [Python] }
  - { id: C2, name: SQL, skills: [SQL] }
"#,
    )
    .unwrap();
    seed(&mut store, &dataset).unwrap();

    let catalog = Catalog::load(&store).unwrap();
    let missing =
        suggest_curriculum_improvements(&catalog.all_course_skills(), catalog.all_target_skills());
    assert_eq!(missing, skill_set(["Excel"]));
}

#[test]
fn test_yaml_fixture_with_empty_standard() {
    let dataset = Dataset::load_yaml(fixture("catalog.yaml")).unwrap();
    let mut store = SqliteStore::in_memory().unwrap();
    seed(&mut store, &dataset).unwrap();
    let catalog = Catalog::load(&store).unwrap();

    let analyzer = CoverageAnalyzer::new(AnalyzerConfig { precision: 1 });
    let db_course = &catalog.courses()[0];
    assert_eq!(db_course.id, CourseId::from("C-DB"));
    let skills = catalog.course_skills(db_course);
    let result = analyzer.map_course_to_targets(&skills, target_entries(catalog.standards()));
    assert_eq!(result[&StandardId::from("DS-1")], 33.3);
    assert_eq!(result[&StandardId::from("EMPTY")], 0.0);

    let report = AlignmentReport::build(&catalog, &AnalyzerConfig::default());
    let gap_ids: Vec<&str> = report.gaps.iter().map(|g| g.target_id.as_str()).collect();
    assert_eq!(gap_ids, vec!["DS-1", "JOB-ANALYST"]);
}

#[test]
fn test_malformed_reference_detected_at_load() {
    let mut store = InMemoryStore::new();
    seed(&mut store, &Dataset::sample()).unwrap();
    store
        .create(
            JobRequirement::new("JOB99", "Quantum Engineer")
                .with_skills(["SKILL1", "QUANTUM"])
                .into(),
        )
        .unwrap();

    match Catalog::load(&store) {
        Err(CatalogError::MalformedReferences(issues)) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].owner_id, "JOB99");
            assert_eq!(issues[0].missing_id, "QUANTUM");
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("dangling skill reference should fail validation"),
    }
}
