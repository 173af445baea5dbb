//! Curriculum entity types
//!
//! Typed identifiers and the records held by the entity store. Skill sets are
//! `BTreeSet`s so they are deduplicated and iterate in a stable order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================
// IDENTIFIERS
// ============================================================

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Identifier of an atomic competency
    SkillId
);
entity_id!(
    /// Identifier of an industry standard
    StandardId
);
entity_id!(
    /// Identifier of a job requirement
    RequirementId
);
entity_id!(
    /// Identifier of a learning objective
    ObjectiveId
);
entity_id!(
    /// Identifier of a course
    CourseId
);

/// Unordered, deduplicated collection of skill identifiers
pub type SkillSet = BTreeSet<SkillId>;

/// Builds a skill set from anything that converts into skill ids
pub fn skill_set<I, S>(ids: I) -> SkillSet
where
    I: IntoIterator<Item = S>,
    S: Into<SkillId>,
{
    ids.into_iter().map(Into::into).collect()
}

// ============================================================
// ENTITIES
// ============================================================

/// An atomic competency. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Skill {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: SkillId::from(id),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// External benchmark defined by a set of required skills
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryStandard {
    pub id: StandardId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: SkillSet,
}

impl IndustryStandard {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: StandardId::from(id),
            name: name.to_string(),
            description: String::new(),
            skills: SkillSet::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillId>,
    {
        self.skills = skill_set(skills);
        self
    }
}

/// Skills required for a job role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub id: RequirementId,
    pub title: String,
    #[serde(default)]
    pub skills: SkillSet,
}

impl JobRequirement {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: RequirementId::from(id),
            title: title.to_string(),
            skills: SkillSet::new(),
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillId>,
    {
        self.skills = skill_set(skills);
        self
    }
}

/// A learning objective, optionally linked to skills
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningObjective {
    pub id: ObjectiveId,
    pub description: String,
    #[serde(default)]
    pub skills: SkillSet,
}

impl LearningObjective {
    pub fn new(id: &str, description: &str) -> Self {
        Self {
            id: ObjectiveId::from(id),
            description: description.to_string(),
            skills: SkillSet::new(),
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillId>,
    {
        self.skills = skill_set(skills);
        self
    }
}

/// A unit of instruction.
///
/// Skills can be attached directly or through learning objectives; the
/// effective coverage of a course is the union of both (see
/// [`crate::catalog::Catalog::course_skills`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(default)]
    pub skills: SkillSet,
    #[serde(default)]
    pub objectives: BTreeSet<ObjectiveId>,
}

impl Course {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: CourseId::from(id),
            name: name.to_string(),
            skills: SkillSet::new(),
            objectives: BTreeSet::new(),
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillId>,
    {
        self.skills = skill_set(skills);
        self
    }

    pub fn with_objectives<I, S>(mut self, objectives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ObjectiveId>,
    {
        self.objectives = objectives.into_iter().map(Into::into).collect();
        self
    }
}

// ============================================================
// ENTITY ENVELOPE
// ============================================================

/// Discriminates the record types held by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Skill,
    IndustryStandard,
    JobRequirement,
    LearningObjective,
    Course,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Skill,
        EntityKind::IndustryStandard,
        EntityKind::JobRequirement,
        EntityKind::LearningObjective,
        EntityKind::Course,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Skill => "skill",
            EntityKind::IndustryStandard => "industry_standard",
            EntityKind::JobRequirement => "job_requirement",
            EntityKind::LearningObjective => "learning_objective",
            EntityKind::Course => "course",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any record the store can hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Skill(Skill),
    IndustryStandard(IndustryStandard),
    JobRequirement(JobRequirement),
    LearningObjective(LearningObjective),
    Course(Course),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Skill(_) => EntityKind::Skill,
            Entity::IndustryStandard(_) => EntityKind::IndustryStandard,
            Entity::JobRequirement(_) => EntityKind::JobRequirement,
            Entity::LearningObjective(_) => EntityKind::LearningObjective,
            Entity::Course(_) => EntityKind::Course,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::Skill(s) => s.id.as_str(),
            Entity::IndustryStandard(s) => s.id.as_str(),
            Entity::JobRequirement(r) => r.id.as_str(),
            Entity::LearningObjective(o) => o.id.as_str(),
            Entity::Course(c) => c.id.as_str(),
        }
    }

    pub fn into_skill(self) -> Option<Skill> {
        match self {
            Entity::Skill(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_standard(self) -> Option<IndustryStandard> {
        match self {
            Entity::IndustryStandard(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_requirement(self) -> Option<JobRequirement> {
        match self {
            Entity::JobRequirement(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_objective(self) -> Option<LearningObjective> {
        match self {
            Entity::LearningObjective(o) => Some(o),
            _ => None,
        }
    }

    pub fn into_course(self) -> Option<Course> {
        match self {
            Entity::Course(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Skill> for Entity {
    fn from(skill: Skill) -> Self {
        Entity::Skill(skill)
    }
}

impl From<IndustryStandard> for Entity {
    fn from(standard: IndustryStandard) -> Self {
        Entity::IndustryStandard(standard)
    }
}

impl From<JobRequirement> for Entity {
    fn from(requirement: JobRequirement) -> Self {
        Entity::JobRequirement(requirement)
    }
}

impl From<LearningObjective> for Entity {
    fn from(objective: LearningObjective) -> Self {
        Entity::LearningObjective(objective)
    }
}

impl From<Course> for Entity {
    fn from(course: Course) -> Self {
        Entity::Course(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_set_deduplicates() {
        let set = skill_set(["SQL", "Python", "SQL"]);
        assert_eq!(set.len(), 2);
        let ordered: Vec<&str> = set.iter().map(|s| s.as_str()).collect();
        assert_eq!(ordered, vec!["Python", "SQL"]);
    }

    #[test]
    fn test_entity_kind_and_id() {
        let entity: Entity = Course::new("CS101", "Intro").into();
        assert_eq!(entity.kind(), EntityKind::Course);
        assert_eq!(entity.id(), "CS101");
        assert!(entity.clone().into_skill().is_none());
        assert_eq!(entity.into_course().map(|c| c.name), Some("Intro".to_string()));
    }

    #[test]
    fn test_course_yaml_defaults() {
        let course: Course = serde_yaml::from_str("id: CS1\nname: Basics\n").unwrap();
        assert!(course.skills.is_empty());
        assert!(course.objectives.is_empty());
    }
}
