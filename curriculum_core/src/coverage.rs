//! Coverage Analyzer
//!
//! Pure set arithmetic over skill sets. Nothing here touches the store:
//! callers load and validate entities first (see [`crate::catalog`]) and pass
//! plain skill sets in.
//!
//! Conventions:
//! - coverage = |course ∩ required| / |required| × 100, rounded half away from
//!   zero to `precision` decimals (default 1)
//! - a target with no required skills has coverage 0.0

use crate::types::{IndustryStandard, JobRequirement, RequirementId, SkillSet, StandardId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Highest number of decimals a coverage percentage is rounded to
pub const MAX_PRECISION: u32 = 6;

// ============================================================
// TARGETS
// ============================================================

/// Anything a course can be measured against
pub trait SkillTarget {
    type Id: Clone + Ord + Display;

    fn target_id(&self) -> &Self::Id;
    fn label(&self) -> &str;
    fn required_skills(&self) -> &SkillSet;
}

impl SkillTarget for IndustryStandard {
    type Id = StandardId;

    fn target_id(&self) -> &StandardId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn required_skills(&self) -> &SkillSet {
        &self.skills
    }
}

impl SkillTarget for JobRequirement {
    type Id = RequirementId;

    fn target_id(&self) -> &RequirementId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn required_skills(&self) -> &SkillSet {
        &self.skills
    }
}

/// Flattens targets into the `(id, required skills)` pairs the analyzer takes
pub fn target_entries<T: SkillTarget>(
    targets: &[T],
) -> impl Iterator<Item = (T::Id, &SkillSet)> + '_ {
    targets
        .iter()
        .map(|t| (t.target_id().clone(), t.required_skills()))
}

// ============================================================
// ANALYZER
// ============================================================

/// Configuration for the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Decimal places coverage percentages are rounded to
    pub precision: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { precision: 1 }
    }
}

/// Skills a target requires that are not covered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGap<K> {
    pub target: K,
    pub missing: SkillSet,
}

pub struct CoverageAnalyzer {
    config: AnalyzerConfig,
}

impl CoverageAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        log::debug!("[ANALYZER] Initializing with config: {:?}", config);
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Coverage of a single target by a course
    pub fn coverage(&self, course_skills: &SkillSet, required_skills: &SkillSet) -> f64 {
        coverage_percent(course_skills, required_skills, self.config.precision)
    }

    /// Maps every target to the percentage of its required skills the course covers
    pub fn map_course_to_targets<'a, K, I>(
        &self,
        course_skills: &SkillSet,
        targets: I,
    ) -> BTreeMap<K, f64>
    where
        K: Ord + Display,
        I: IntoIterator<Item = (K, &'a SkillSet)>,
    {
        targets
            .into_iter()
            .map(|(id, required)| {
                if required.is_empty() {
                    log::debug!("[ANALYZER] Target {} requires no skills, coverage is 0", id);
                }
                let percent = self.coverage(course_skills, required);
                (id, percent)
            })
            .collect()
    }

    /// Same as [`Self::map_course_to_targets`] for typed targets
    pub fn map_course_to<T: SkillTarget>(
        &self,
        course_skills: &SkillSet,
        targets: &[T],
    ) -> BTreeMap<T::Id, f64> {
        self.map_course_to_targets(course_skills, target_entries(targets))
    }
}

impl Default for CoverageAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

// ============================================================
// PURE FUNCTIONS
// ============================================================

/// Rounds half away from zero to `precision` decimals (capped at [`MAX_PRECISION`])
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    (value * factor).round() / factor
}

/// Percentage of `required_skills` present in `course_skills`, in `[0, 100]`
pub fn coverage_percent(course_skills: &SkillSet, required_skills: &SkillSet, precision: u32) -> f64 {
    if required_skills.is_empty() {
        return 0.0;
    }
    let covered = required_skills.intersection(course_skills).count();
    round_to(covered as f64 / required_skills.len() as f64 * 100.0, precision)
}

/// Every skill required by at least one target that no course covers
pub fn suggest_curriculum_improvements<'a, C, T>(all_courses: C, all_targets: T) -> SkillSet
where
    C: IntoIterator<Item = &'a SkillSet>,
    T: IntoIterator<Item = &'a SkillSet>,
{
    let covered = union_of(all_courses);
    let required = union_of(all_targets);
    required.difference(&covered).cloned().collect()
}

/// Targets sharing at least one skill with the course, in input order
pub fn matched_targets<'a, K, I>(course_skills: &SkillSet, targets: I) -> Vec<K>
where
    I: IntoIterator<Item = (K, &'a SkillSet)>,
{
    targets
        .into_iter()
        .filter(|(_, required)| !required.is_disjoint(course_skills))
        .map(|(id, _)| id)
        .collect()
}

/// Per-target skills that no course covers. Fully covered targets are omitted.
pub fn identify_curriculum_gaps<'a, K, C, T>(all_courses: C, targets: T) -> Vec<TargetGap<K>>
where
    C: IntoIterator<Item = &'a SkillSet>,
    T: IntoIterator<Item = (K, &'a SkillSet)>,
{
    let covered = union_of(all_courses);
    targets
        .into_iter()
        .filter_map(|(target, required)| {
            let missing: SkillSet = required.difference(&covered).cloned().collect();
            (!missing.is_empty()).then_some(TargetGap { target, missing })
        })
        .collect()
}

/// Per-target skills a single course is missing
pub fn course_gaps<'a, K, T>(course_skills: &'a SkillSet, targets: T) -> Vec<TargetGap<K>>
where
    T: IntoIterator<Item = (K, &'a SkillSet)>,
{
    identify_curriculum_gaps(std::iter::once(course_skills), targets)
}

fn union_of<'a, I>(sets: I) -> SkillSet
where
    I: IntoIterator<Item = &'a SkillSet>,
{
    sets.into_iter().flat_map(|s| s.iter().cloned()).collect()
}
