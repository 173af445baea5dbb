//! Catalog Module
//!
//! Loads every entity from a store into memory and checks referential
//! integrity. This is the data-access boundary: once a [`Catalog`] exists,
//! every skill and objective it references is known, so the analyzer never
//! has to deal with malformed input.

use crate::store::{EntityKey, EntityStore, StoreError};
use crate::types::{
    Course, Entity, EntityKind, IndustryStandard, JobRequirement, LearningObjective, ObjectiveId,
    Skill, SkillId, SkillSet,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================
// ERRORS
// ============================================================

/// A reference to an entity that does not exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedReference {
    pub owner_kind: EntityKind,
    pub owner_id: String,
    pub missing_kind: EntityKind,
    pub missing_id: String,
}

impl fmt::Display for MalformedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' references unknown {} '{}'",
            self.owner_kind, self.owner_id, self.missing_kind, self.missing_id
        )
    }
}

fn describe_references(references: &[MalformedReference]) -> String {
    let details: Vec<String> = references.iter().map(ToString::to_string).collect();
    format!(
        "{} malformed reference(s): {}",
        references.len(),
        details.join("; ")
    )
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Failed to load catalog: {0}")]
    Store(#[from] StoreError),

    #[error("{}", describe_references(.0))]
    MalformedReferences(Vec<MalformedReference>),
}

// ============================================================
// CATALOG
// ============================================================

/// Validated, in-memory view of the whole store
#[derive(Debug, Clone)]
pub struct Catalog {
    skills: BTreeMap<SkillId, Skill>,
    standards: Vec<IndustryStandard>,
    requirements: Vec<JobRequirement>,
    objectives: BTreeMap<ObjectiveId, LearningObjective>,
    courses: Vec<Course>,
}

impl Catalog {
    /// Lists every kind from the store and validates the result
    pub fn load<S: EntityStore + ?Sized>(store: &S) -> Result<Self, CatalogError> {
        let skills = list_as(store, EntityKind::Skill, Entity::into_skill)?;
        let standards = list_as(store, EntityKind::IndustryStandard, Entity::into_standard)?;
        let requirements = list_as(store, EntityKind::JobRequirement, Entity::into_requirement)?;
        let objectives = list_as(store, EntityKind::LearningObjective, Entity::into_objective)?;
        let courses = list_as(store, EntityKind::Course, Entity::into_course)?;

        let catalog = Self::from_parts(skills, standards, requirements, objectives, courses)?;
        log::info!(
            "[CATALOG] Loaded {} skills, {} standards, {} requirements, {} objectives, {} courses",
            catalog.skills.len(),
            catalog.standards.len(),
            catalog.requirements.len(),
            catalog.objectives.len(),
            catalog.courses.len()
        );
        Ok(catalog)
    }

    /// Fetches only the given entities and validates them as a whole.
    ///
    /// Anything else the store holds is ignored, so one dataset's catalog is
    /// not mixed with records seeded by earlier runs.
    pub fn load_keys<S, I>(store: &S, keys: I) -> Result<Self, CatalogError>
    where
        S: EntityStore + ?Sized,
        I: IntoIterator<Item = EntityKey>,
    {
        let entities = keys
            .into_iter()
            .map(|key| store.get(key.kind, &key.id))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Self::from_entities(entities)?;
        log::info!(
            "[CATALOG] Loaded {} skills, {} standards, {} requirements, {} objectives, {} courses by key",
            catalog.skills.len(),
            catalog.standards.len(),
            catalog.requirements.len(),
            catalog.objectives.len(),
            catalog.courses.len()
        );
        Ok(catalog)
    }

    /// Sorts mixed records by kind, ordering each kind by id like [`EntityStore::list`]
    pub fn from_entities<I>(entities: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Entity>,
    {
        let mut skills = Vec::new();
        let mut standards = Vec::new();
        let mut requirements = Vec::new();
        let mut objectives = Vec::new();
        let mut courses = Vec::new();

        for entity in entities {
            match entity {
                Entity::Skill(s) => skills.push(s),
                Entity::IndustryStandard(s) => standards.push(s),
                Entity::JobRequirement(r) => requirements.push(r),
                Entity::LearningObjective(o) => objectives.push(o),
                Entity::Course(c) => courses.push(c),
            }
        }
        standards.sort_by(|a: &IndustryStandard, b| a.id.cmp(&b.id));
        requirements.sort_by(|a: &JobRequirement, b| a.id.cmp(&b.id));
        courses.sort_by(|a: &Course, b| a.id.cmp(&b.id));

        Self::from_parts(skills, standards, requirements, objectives, courses)
    }

    /// Builds a catalog from loose records, rejecting dangling references
    pub fn from_parts(
        skills: Vec<Skill>,
        standards: Vec<IndustryStandard>,
        requirements: Vec<JobRequirement>,
        objectives: Vec<LearningObjective>,
        courses: Vec<Course>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            skills: skills.into_iter().map(|s| (s.id.clone(), s)).collect(),
            standards,
            requirements,
            objectives: objectives.into_iter().map(|o| (o.id.clone(), o)).collect(),
            courses,
        };

        let issues = catalog.validate();
        if issues.is_empty() {
            Ok(catalog)
        } else {
            for issue in &issues {
                log::warn!("[CATALOG] {}", issue);
            }
            Err(CatalogError::MalformedReferences(issues))
        }
    }

    /// Every dangling skill or objective reference, in a stable order
    pub fn validate(&self) -> Vec<MalformedReference> {
        let mut issues = Vec::new();

        for standard in &self.standards {
            self.check_skills(
                EntityKind::IndustryStandard,
                standard.id.as_str(),
                &standard.skills,
                &mut issues,
            );
        }
        for requirement in &self.requirements {
            self.check_skills(
                EntityKind::JobRequirement,
                requirement.id.as_str(),
                &requirement.skills,
                &mut issues,
            );
        }
        for objective in self.objectives.values() {
            self.check_skills(
                EntityKind::LearningObjective,
                objective.id.as_str(),
                &objective.skills,
                &mut issues,
            );
        }
        for course in &self.courses {
            self.check_skills(EntityKind::Course, course.id.as_str(), &course.skills, &mut issues);
            for objective_id in &course.objectives {
                if !self.objectives.contains_key(objective_id) {
                    issues.push(MalformedReference {
                        owner_kind: EntityKind::Course,
                        owner_id: course.id.to_string(),
                        missing_kind: EntityKind::LearningObjective,
                        missing_id: objective_id.to_string(),
                    });
                }
            }
        }

        issues
    }

    fn check_skills(
        &self,
        owner_kind: EntityKind,
        owner_id: &str,
        skills: &SkillSet,
        issues: &mut Vec<MalformedReference>,
    ) {
        for skill_id in skills {
            if !self.skills.contains_key(skill_id) {
                issues.push(MalformedReference {
                    owner_kind,
                    owner_id: owner_id.to_string(),
                    missing_kind: EntityKind::Skill,
                    missing_id: skill_id.to_string(),
                });
            }
        }
    }

    pub fn skill(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.get(id)
    }

    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    /// Display name of a skill, falling back to its id
    pub fn skill_name<'a>(&'a self, id: &'a SkillId) -> &'a str {
        self.skill(id).map(|s| s.name.as_str()).unwrap_or(id.as_str())
    }

    pub fn objective(&self, id: &ObjectiveId) -> Option<&LearningObjective> {
        self.objectives.get(id)
    }

    pub fn standards(&self) -> &[IndustryStandard] {
        &self.standards
    }

    pub fn requirements(&self) -> &[JobRequirement] {
        &self.requirements
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Skills a course covers directly or through its learning objectives
    pub fn course_skills(&self, course: &Course) -> SkillSet {
        let mut skills = course.skills.clone();
        for objective in course.objectives.iter().filter_map(|id| self.objective(id)) {
            skills.extend(objective.skills.iter().cloned());
        }
        skills
    }

    /// Effective skill set of every course, in course order
    pub fn all_course_skills(&self) -> Vec<SkillSet> {
        self.courses.iter().map(|c| self.course_skills(c)).collect()
    }

    /// Required skill sets of every standard followed by every requirement
    pub fn all_target_skills(&self) -> impl Iterator<Item = &SkillSet> {
        self.standards
            .iter()
            .map(|s| &s.skills)
            .chain(self.requirements.iter().map(|r| &r.skills))
    }
}

fn list_as<S, T>(
    store: &S,
    kind: EntityKind,
    extract: fn(Entity) -> Option<T>,
) -> Result<Vec<T>, StoreError>
where
    S: EntityStore + ?Sized,
{
    Ok(store.list(kind)?.into_iter().filter_map(extract).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::types::skill_set;

    fn seeded_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for skill in [
            Skill::new("PY", "Python", ""),
            Skill::new("SQL", "SQL", ""),
            Skill::new("XL", "Excel", ""),
        ] {
            store.create(skill.into()).unwrap();
        }
        store
            .create(
                LearningObjective::new("OBJ1", "Query data")
                    .with_skills(["SQL"])
                    .into(),
            )
            .unwrap();
        store
            .create(
                Course::new("C1", "Data 101")
                    .with_skills(["PY"])
                    .with_objectives(["OBJ1"])
                    .into(),
            )
            .unwrap();
        store
            .create(
                JobRequirement::new("JOB1", "Analyst")
                    .with_skills(["PY", "SQL", "XL"])
                    .into(),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_course_skills_include_objectives() {
        let catalog = Catalog::load(&seeded_store()).unwrap();
        let course = &catalog.courses()[0];
        assert_eq!(catalog.course_skills(course), skill_set(["PY", "SQL"]));
        assert_eq!(catalog.all_target_skills().count(), 1);
        assert_eq!(catalog.skill_name(&SkillId::from("XL")), "Excel");
        assert_eq!(catalog.skill_name(&SkillId::from("??")), "??");
    }

    #[test]
    fn test_dangling_references_are_all_reported() {
        let mut store = seeded_store();
        store
            .create(
                IndustryStandard::new("STD1", "Broken")
                    .with_skills(["PY", "GHOST"])
                    .into(),
            )
            .unwrap();
        store
            .create(
                Course::new("C2", "Broken course")
                    .with_objectives(["MISSING"])
                    .into(),
            )
            .unwrap();

        match Catalog::load(&store) {
            Err(CatalogError::MalformedReferences(issues)) => {
                assert_eq!(issues.len(), 2);
                assert_eq!(issues[0].owner_id, "STD1");
                assert_eq!(issues[0].missing_kind, EntityKind::Skill);
                assert_eq!(issues[0].missing_id, "GHOST");
                assert_eq!(issues[1].owner_kind, EntityKind::Course);
                assert_eq!(issues[1].missing_kind, EntityKind::LearningObjective);
            }
            other => panic!("expected malformed references, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_keys_ignores_other_records() {
        let mut store = seeded_store();
        store
            .create(Course::new("C0", "Unrelated").with_skills(["XL"]).into())
            .unwrap();

        let keys = [
            EntityKey::new(EntityKind::Course, "C1"),
            EntityKey::new(EntityKind::Skill, "PY"),
            EntityKey::new(EntityKind::Skill, "SQL"),
            EntityKey::new(EntityKind::LearningObjective, "OBJ1"),
        ];
        let catalog = Catalog::load_keys(&store, keys).unwrap();
        let ids: Vec<&str> = catalog.courses().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["C1"]);
        assert!(catalog.requirements().is_empty());
        assert!(catalog.skill(&SkillId::from("XL")).is_none());

        let err = Catalog::load_keys(&store, [EntityKey::new(EntityKind::Course, "NOPE")]).unwrap_err();
        assert!(matches!(err, CatalogError::Store(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_error_message_lists_issues() {
        let err = Catalog::from_parts(
            Vec::new(),
            Vec::new(),
            vec![JobRequirement::new("JOB1", "Dev").with_skills(["RUST"])],
            Vec::new(),
            Vec::new(),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("1 malformed reference"));
        assert!(message.contains("job_requirement 'JOB1' references unknown skill 'RUST'"));
    }
}
