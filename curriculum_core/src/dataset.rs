//! Dataset loading and store seeding
//!
//! A dataset is the full set of entities in one YAML document:
//!
//! ```yaml
//! skills:
//!   - { id: PY, name: Python Programming, description: Write Python code }
//! standards:
//!   - { id: STD1, name: Software Development, skills: [PY] }
//! requirements:
//!   - { id: JOB1, title: Junior Developer, skills: [PY] }
//! objectives:
//!   - { id: OBJ1, description: Write simple programs, skills: [PY] }
//! courses:
//!   - { id: CS101, name: Intro to Programming, objectives: [OBJ1] }
//! ```

use crate::catalog::{Catalog, CatalogError};
use crate::store::{EntityKey, EntityStore, StoreError};
use crate::types::{Course, Entity, EntityKind, IndustryStandard, JobRequirement, LearningObjective, Skill};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to seed store: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid dataset: {0}")]
    Invalid(#[from] CatalogError),

    #[error("{}", describe_conflicts(.0))]
    Conflicts(Vec<EntityKey>),
}

fn describe_conflicts(keys: &[EntityKey]) -> String {
    let details: Vec<String> = keys.iter().map(ToString::to_string).collect();
    format!(
        "{} stored record(s) differ from the dataset and cannot be updated: {}",
        keys.len(),
        details.join(", ")
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub standards: Vec<IndustryStandard>,
    #[serde(default)]
    pub requirements: Vec<JobRequirement>,
    #[serde(default)]
    pub objectives: Vec<LearningObjective>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// Outcome of [`seed`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

impl Dataset {
    pub fn load_yaml(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let dataset: Dataset = serde_yaml::from_reader(reader)?;
        Ok(dataset)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, DatasetError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Every entity, skills and objectives first
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        let skills = self.skills.iter().cloned().map(Entity::from);
        let objectives = self.objectives.iter().cloned().map(Entity::from);
        let standards = self.standards.iter().cloned().map(Entity::from);
        let requirements = self.requirements.iter().cloned().map(Entity::from);
        let courses = self.courses.iter().cloned().map(Entity::from);
        skills
            .chain(objectives)
            .chain(standards)
            .chain(requirements)
            .chain(courses)
    }

    /// Distinct `(kind, id)` of every entity
    pub fn keys(&self) -> BTreeSet<EntityKey> {
        self.entities().map(|e| EntityKey::of(&e)).collect()
    }

    /// Checks that every reference resolves within the dataset itself
    pub fn validate(&self) -> Result<Catalog, CatalogError> {
        Catalog::from_entities(self.entities())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
            + self.standards.len()
            + self.requirements.len()
            + self.objectives.len()
            + self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Built-in demonstration data
    pub fn sample() -> Self {
        let skills = vec![
            Skill::new("SKILL1", "Python Programming", "Ability to write Python code"),
            Skill::new("SKILL2", "Data Structures", "Understanding of basic data structures"),
            Skill::new("SKILL3", "Machine Learning", "Knowledge of ML algorithms"),
            Skill::new("SKILL4", "Database Design", "Ability to design and implement databases"),
            Skill::new("SKILL5", "Web Development", "Skills in HTML, CSS, and JavaScript"),
            Skill::new("SKILL6", "Cloud Computing", "Understanding of cloud platforms and services"),
            Skill::new("SKILL7", "Cybersecurity", "Knowledge of security principles and practices"),
            Skill::new("SKILL8", "Agile Methodologies", "Experience with Agile development processes"),
            Skill::new("SKILL9", "DevOps", "Understanding of DevOps practices and tools"),
            Skill::new("SKILL10", "Big Data", "Experience with big data technologies"),
        ];

        let standards = vec![
            IndustryStandard::new("STD1", "Software Development")
                .with_description("Core software engineering practice")
                .with_skills(["SKILL1", "SKILL2", "SKILL5", "SKILL8"]),
            IndustryStandard::new("STD2", "Data Science")
                .with_description("Analysing and modelling data at scale")
                .with_skills(["SKILL1", "SKILL3", "SKILL4", "SKILL10"]),
            IndustryStandard::new("STD3", "Cloud Architecture")
                .with_description("Designing secure cloud systems")
                .with_skills(["SKILL6", "SKILL7", "SKILL9"]),
            IndustryStandard::new("STD4", "Web Technologies")
                .with_description("Building and operating web applications")
                .with_skills(["SKILL5", "SKILL6", "SKILL9"]),
            IndustryStandard::new("STD5", "Artificial Intelligence")
                .with_description("Machine learning systems")
                .with_skills(["SKILL3", "SKILL10", "SKILL1"]),
        ];

        let requirements = vec![
            JobRequirement::new("JOB1", "Junior Developer")
                .with_skills(["SKILL1", "SKILL2", "SKILL5", "SKILL8"]),
            JobRequirement::new("JOB2", "Data Analyst")
                .with_skills(["SKILL1", "SKILL3", "SKILL4", "SKILL10"]),
            JobRequirement::new("JOB3", "Cloud Engineer")
                .with_skills(["SKILL6", "SKILL7", "SKILL9", "SKILL1"]),
            JobRequirement::new("JOB4", "Web Developer").with_skills(["SKILL5", "SKILL1", "SKILL6"]),
            JobRequirement::new("JOB5", "Machine Learning Engineer")
                .with_skills(["SKILL3", "SKILL1", "SKILL10", "SKILL4"]),
            JobRequirement::new("JOB6", "DevOps Engineer")
                .with_skills(["SKILL9", "SKILL6", "SKILL7", "SKILL1"]),
            JobRequirement::new("JOB7", "Full Stack Developer")
                .with_skills(["SKILL1", "SKILL5", "SKILL4", "SKILL6", "SKILL9"]),
        ];

        let objectives = vec![
            LearningObjective::new("CS101-1", "Understand basic programming concepts")
                .with_skills(["SKILL1"]),
            LearningObjective::new("CS101-2", "Write simple programs").with_skills(["SKILL1"]),
            LearningObjective::new("CS201-1", "Implement basic data structures")
                .with_skills(["SKILL2"]),
            LearningObjective::new("CS201-2", "Analyze algorithm complexity").with_skills(["SKILL2"]),
            LearningObjective::new("CS301-1", "Deploy a web application to the cloud")
                .with_skills(["SKILL6"]),
        ];

        let courses = vec![
            Course::new("CS101", "Introduction to Programming")
                .with_objectives(["CS101-1", "CS101-2"]),
            Course::new("CS201", "Data Structures").with_objectives(["CS201-1", "CS201-2"]),
            Course::new("CS301", "Web and Database Systems")
                .with_skills(["SKILL4", "SKILL5"])
                .with_objectives(["CS301-1"]),
        ];

        Self {
            skills,
            standards,
            requirements,
            objectives,
            courses,
        }
    }
}

/// Inserts every entity the store does not hold yet.
///
/// Nothing is written unless the dataset is self-consistent and agrees with
/// what the store already holds. An existing record identical to the dataset's
/// is skipped, so seeding a persistent database twice is a no-op the second
/// time. A record that differs is reported as a conflict since the store has
/// no update.
pub fn seed<S: EntityStore + ?Sized>(store: &mut S, dataset: &Dataset) -> Result<SeedSummary, DatasetError> {
    dataset.validate()?;

    let mut summary = SeedSummary::default();
    let mut pending: BTreeMap<EntityKey, Entity> = BTreeMap::new();
    let mut conflicts = BTreeSet::new();

    for entity in dataset.entities() {
        let key = EntityKey::of(&entity);
        let existing = match pending.get(&key) {
            Some(queued) => Some(queued.clone()),
            None => match store.get(key.kind, &key.id) {
                Ok(stored) => Some(stored),
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e.into()),
            },
        };

        match existing {
            Some(other) if other == entity => {
                log::debug!("[SEED] Skipping existing {}", key);
                summary.skipped += 1;
            }
            Some(_) => {
                log::warn!("[SEED] {} differs from the stored record", key);
                conflicts.insert(key);
            }
            None => {
                pending.insert(key, entity);
            }
        }
    }

    if !conflicts.is_empty() {
        return Err(DatasetError::Conflicts(conflicts.into_iter().collect()));
    }

    // skills and objectives first, matching `entities`
    let mut queued: Vec<Entity> = pending.into_values().collect();
    queued.sort_by_key(|e| insert_rank(e.kind()));
    for entity in queued {
        store.create(entity)?;
        summary.inserted += 1;
    }

    log::info!(
        "[SEED] Inserted {} entities, skipped {} existing",
        summary.inserted,
        summary.skipped
    );
    Ok(summary)
}

fn insert_rank(kind: EntityKind) -> u8 {
    match kind {
        EntityKind::Skill => 0,
        EntityKind::LearningObjective => 1,
        EntityKind::IndustryStandard => 2,
        EntityKind::JobRequirement => 3,
        EntityKind::Course => 4,
    }
}
