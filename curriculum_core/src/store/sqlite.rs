//! SQLite-backed entity store
//!
//! One table per entity kind plus one link table per skill/objective
//! relation. Foreign keys are not enforced: a dangling link is stored as-is
//! and reported when the catalog is loaded.

use super::{EntityKey, EntityStore, StoreError};
use crate::types::{
    Course, Entity, EntityKind, IndustryStandard, JobRequirement, LearningObjective, Skill,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS skills (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS industry_standards (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS standard_skills (
    standard_id TEXT NOT NULL,
    skill_id TEXT NOT NULL,
    PRIMARY KEY (standard_id, skill_id)
);
CREATE TABLE IF NOT EXISTS job_requirements (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS requirement_skills (
    requirement_id TEXT NOT NULL,
    skill_id TEXT NOT NULL,
    PRIMARY KEY (requirement_id, skill_id)
);
CREATE TABLE IF NOT EXISTS learning_objectives (
    id TEXT PRIMARY KEY,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS objective_skills (
    objective_id TEXT NOT NULL,
    skill_id TEXT NOT NULL,
    PRIMARY KEY (objective_id, skill_id)
);
CREATE TABLE IF NOT EXISTS courses (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS course_skills (
    course_id TEXT NOT NULL,
    skill_id TEXT NOT NULL,
    PRIMARY KEY (course_id, skill_id)
);
CREATE TABLE IF NOT EXISTS course_objectives (
    course_id TEXT NOT NULL,
    objective_id TEXT NOT NULL,
    PRIMARY KEY (course_id, objective_id)
);
";

/// A many-to-many link table
struct Link {
    table: &'static str,
    owner: &'static str,
    target: &'static str,
}

const STANDARD_SKILLS: Link = Link {
    table: "standard_skills",
    owner: "standard_id",
    target: "skill_id",
};
const REQUIREMENT_SKILLS: Link = Link {
    table: "requirement_skills",
    owner: "requirement_id",
    target: "skill_id",
};
const OBJECTIVE_SKILLS: Link = Link {
    table: "objective_skills",
    owner: "objective_id",
    target: "skill_id",
};
const COURSE_SKILLS: Link = Link {
    table: "course_skills",
    owner: "course_id",
    target: "skill_id",
};
const COURSE_OBJECTIVES: Link = Link {
    table: "course_objectives",
    owner: "course_id",
    target: "objective_id",
};

fn table_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Skill => "skills",
        EntityKind::IndustryStandard => "industry_standards",
        EntityKind::JobRequirement => "job_requirements",
        EntityKind::LearningObjective => "learning_objectives",
        EntityKind::Course => "courses",
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a database file, creating parent directories as needed
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = db_path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        log::info!("[STORE] Opened SQLite store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Create an in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn exists(&self, kind: EntityKind, id: &str) -> Result<bool, StoreError> {
        let sql = format!("SELECT 1 FROM {} WHERE id = ?1", table_for(kind));
        let found = self
            .conn
            .query_row(&sql, [id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    fn linked_ids(&self, link: &Link, owner_id: &str) -> Result<Vec<String>, StoreError> {
        let sql = format!(
            "SELECT {target} FROM {table} WHERE {owner} = ?1 ORDER BY {target}",
            target = link.target,
            table = link.table,
            owner = link.owner,
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([owner_id], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn not_found(kind: EntityKind, id: &str) -> StoreError {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    fn get_skill(&self, id: &str) -> Result<Skill, StoreError> {
        self.conn
            .query_row(
                "SELECT id, name, description FROM skills WHERE id = ?1",
                [id],
                |row| {
                    Ok(Skill {
                        id: row.get::<_, String>(0)?.into(),
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| Self::not_found(EntityKind::Skill, id))
    }

    fn get_standard(&self, id: &str) -> Result<IndustryStandard, StoreError> {
        let (name, description): (String, String) = self
            .conn
            .query_row(
                "SELECT name, description FROM industry_standards WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .ok_or_else(|| Self::not_found(EntityKind::IndustryStandard, id))?;

        Ok(IndustryStandard::new(id, &name)
            .with_description(&description)
            .with_skills(self.linked_ids(&STANDARD_SKILLS, id)?))
    }

    fn get_requirement(&self, id: &str) -> Result<JobRequirement, StoreError> {
        let title: String = self
            .conn
            .query_row(
                "SELECT title FROM job_requirements WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Self::not_found(EntityKind::JobRequirement, id))?;

        Ok(JobRequirement::new(id, &title).with_skills(self.linked_ids(&REQUIREMENT_SKILLS, id)?))
    }

    fn get_objective(&self, id: &str) -> Result<LearningObjective, StoreError> {
        let description: String = self
            .conn
            .query_row(
                "SELECT description FROM learning_objectives WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Self::not_found(EntityKind::LearningObjective, id))?;

        Ok(LearningObjective::new(id, &description)
            .with_skills(self.linked_ids(&OBJECTIVE_SKILLS, id)?))
    }

    fn get_course(&self, id: &str) -> Result<Course, StoreError> {
        let name: String = self
            .conn
            .query_row("SELECT name FROM courses WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or_else(|| Self::not_found(EntityKind::Course, id))?;

        Ok(Course::new(id, &name)
            .with_skills(self.linked_ids(&COURSE_SKILLS, id)?)
            .with_objectives(self.linked_ids(&COURSE_OBJECTIVES, id)?))
    }
}

fn insert_links<'a, I>(conn: &Connection, link: &Link, owner_id: &str, targets: I) -> rusqlite::Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let sql = format!(
        "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
        link.table, link.owner, link.target
    );
    let mut stmt = conn.prepare(&sql)?;
    for target in targets {
        stmt.execute(params![owner_id, target])?;
    }
    Ok(())
}

impl EntityStore for SqliteStore {
    fn create(&mut self, entity: Entity) -> Result<EntityKey, StoreError> {
        let key = EntityKey::of(&entity);
        if self.exists(key.kind, &key.id)? {
            return Err(StoreError::AlreadyExists {
                kind: key.kind,
                id: key.id,
            });
        }

        let tx = self.conn.transaction()?;
        match &entity {
            Entity::Skill(skill) => {
                tx.execute(
                    "INSERT INTO skills (id, name, description) VALUES (?1, ?2, ?3)",
                    params![skill.id.as_str(), skill.name, skill.description],
                )?;
            }
            Entity::IndustryStandard(standard) => {
                tx.execute(
                    "INSERT INTO industry_standards (id, name, description) VALUES (?1, ?2, ?3)",
                    params![standard.id.as_str(), standard.name, standard.description],
                )?;
                insert_links(
                    &tx,
                    &STANDARD_SKILLS,
                    standard.id.as_str(),
                    standard.skills.iter().map(|s| s.as_str()),
                )?;
            }
            Entity::JobRequirement(requirement) => {
                tx.execute(
                    "INSERT INTO job_requirements (id, title) VALUES (?1, ?2)",
                    params![requirement.id.as_str(), requirement.title],
                )?;
                insert_links(
                    &tx,
                    &REQUIREMENT_SKILLS,
                    requirement.id.as_str(),
                    requirement.skills.iter().map(|s| s.as_str()),
                )?;
            }
            Entity::LearningObjective(objective) => {
                tx.execute(
                    "INSERT INTO learning_objectives (id, description) VALUES (?1, ?2)",
                    params![objective.id.as_str(), objective.description],
                )?;
                insert_links(
                    &tx,
                    &OBJECTIVE_SKILLS,
                    objective.id.as_str(),
                    objective.skills.iter().map(|s| s.as_str()),
                )?;
            }
            Entity::Course(course) => {
                tx.execute(
                    "INSERT INTO courses (id, name) VALUES (?1, ?2)",
                    params![course.id.as_str(), course.name],
                )?;
                insert_links(
                    &tx,
                    &COURSE_SKILLS,
                    course.id.as_str(),
                    course.skills.iter().map(|s| s.as_str()),
                )?;
                insert_links(
                    &tx,
                    &COURSE_OBJECTIVES,
                    course.id.as_str(),
                    course.objectives.iter().map(|o| o.as_str()),
                )?;
            }
        }
        tx.commit()?;

        log::debug!("[STORE] Created {}", key);
        Ok(key)
    }

    fn get(&self, kind: EntityKind, id: &str) -> Result<Entity, StoreError> {
        let entity: Entity = match kind {
            EntityKind::Skill => self.get_skill(id)?.into(),
            EntityKind::IndustryStandard => self.get_standard(id)?.into(),
            EntityKind::JobRequirement => self.get_requirement(id)?.into(),
            EntityKind::LearningObjective => self.get_objective(id)?.into(),
            EntityKind::Course => self.get_course(id)?.into(),
        };
        Ok(entity)
    }

    fn list(&self, kind: EntityKind) -> Result<Vec<Entity>, StoreError> {
        let sql = format!("SELECT id FROM {} ORDER BY id", table_for(kind));
        let ids = {
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        ids.iter().map(|id| self.get(kind, id)).collect()
    }
}
