//! Alignment Report
//!
//! Runs the analyzer over a whole catalog and collects the results into one
//! serializable structure for rendering.

use crate::catalog::Catalog;
use crate::coverage::{
    identify_curriculum_gaps, matched_targets, suggest_curriculum_improvements, target_entries,
    AnalyzerConfig, CoverageAnalyzer, SkillTarget,
};
use crate::types::{CourseId, EntityKind, SkillId, SkillSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A skill with its display fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRef {
    pub id: SkillId,
    pub name: String,
    pub description: String,
}

impl SkillRef {
    fn resolve(catalog: &Catalog, id: &SkillId) -> Self {
        Self {
            id: id.clone(),
            name: catalog.skill_name(id).to_string(),
            description: catalog
                .skill(id)
                .map(|s| s.description.clone())
                .unwrap_or_default(),
        }
    }
}

/// Coverage of one target by one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCoverage {
    pub id: String,
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseAlignment {
    pub course_id: CourseId,
    pub course_name: String,
    /// Effective skills, including those reached through objectives
    pub skills: SkillSet,
    pub standards: Vec<TargetCoverage>,
    pub requirements: Vec<TargetCoverage>,
    /// Targets sharing at least one skill with the course
    pub matched: Vec<String>,
}

/// Skills a target needs that no course covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapEntry {
    pub target_kind: EntityKind,
    pub target_id: String,
    pub label: String,
    pub missing: Vec<SkillRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub precision: u32,
    pub courses: Vec<CourseAlignment>,
    pub gaps: Vec<GapEntry>,
    /// Required by some standard or requirement, covered by no course
    pub suggested_skills: Vec<SkillRef>,
}

impl AlignmentReport {
    pub fn build(catalog: &Catalog, config: &AnalyzerConfig) -> Self {
        let analyzer = CoverageAnalyzer::new(config.clone());
        let course_sets = catalog.all_course_skills();

        let courses = catalog
            .courses()
            .iter()
            .zip(&course_sets)
            .map(|(course, skills)| {
                let mut matched: Vec<String> =
                    matched_targets(skills, target_entries(catalog.standards()))
                        .into_iter()
                        .map(|id| id.to_string())
                        .collect();
                matched.extend(
                    matched_targets(skills, target_entries(catalog.requirements()))
                        .into_iter()
                        .map(|id| id.to_string()),
                );

                CourseAlignment {
                    course_id: course.id.clone(),
                    course_name: course.name.clone(),
                    skills: skills.clone(),
                    standards: coverage_rows(&analyzer, skills, catalog.standards()),
                    requirements: coverage_rows(&analyzer, skills, catalog.requirements()),
                    matched,
                }
            })
            .collect();

        let mut gaps = gap_rows(
            catalog,
            &course_sets,
            EntityKind::IndustryStandard,
            catalog.standards(),
        );
        gaps.extend(gap_rows(
            catalog,
            &course_sets,
            EntityKind::JobRequirement,
            catalog.requirements(),
        ));

        let suggested_skills = suggest_curriculum_improvements(&course_sets, catalog.all_target_skills())
            .iter()
            .map(|id| SkillRef::resolve(catalog, id))
            .collect::<Vec<_>>();

        log::info!(
            "[REPORT] {} courses analysed, {} gaps, {} suggested skills",
            catalog.courses().len(),
            gaps.len(),
            suggested_skills.len()
        );

        Self {
            id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            precision: config.precision,
            courses,
            gaps,
            suggested_skills,
        }
    }

    /// True when every required skill is covered by some course
    pub fn is_aligned(&self) -> bool {
        self.suggested_skills.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn labels_of<T: SkillTarget>(targets: &[T]) -> BTreeMap<&T::Id, &str> {
    targets.iter().map(|t| (t.target_id(), t.label())).collect()
}

fn coverage_rows<T: SkillTarget>(
    analyzer: &CoverageAnalyzer,
    course_skills: &SkillSet,
    targets: &[T],
) -> Vec<TargetCoverage> {
    let labels = labels_of(targets);
    analyzer
        .map_course_to(course_skills, targets)
        .into_iter()
        .map(|(id, percent)| TargetCoverage {
            label: labels.get(&id).copied().unwrap_or_default().to_string(),
            id: id.to_string(),
            percent,
        })
        .collect()
}

fn gap_rows<T: SkillTarget>(
    catalog: &Catalog,
    course_sets: &[SkillSet],
    kind: EntityKind,
    targets: &[T],
) -> Vec<GapEntry> {
    let labels = labels_of(targets);
    identify_curriculum_gaps(course_sets, target_entries(targets))
        .into_iter()
        .map(|gap| GapEntry {
            target_kind: kind,
            label: labels.get(&gap.target).copied().unwrap_or_default().to_string(),
            target_id: gap.target.to_string(),
            missing: gap
                .missing
                .iter()
                .map(|id| SkillRef::resolve(catalog, id))
                .collect(),
        })
        .collect()
}
