//! Plain-text rendering of analysis results

use crate::MarketTrends;
use curriculum_core::market::SkillDemand;
use curriculum_core::report::{AlignmentReport, GapEntry, TargetCoverage};
use curriculum_core::types::EntityKind;
use std::fmt::{self, Display, Formatter};

pub const ALIGNED_MESSAGE: &str =
    "No improvements suggested. The curriculum aligns well with industry standards and job requirements.";

/// Per-course coverage followed by the suggested skills
pub fn render_report(report: &AlignmentReport) -> String {
    ReportText(report).to_string()
}

pub fn render_suggestions(report: &AlignmentReport) -> String {
    SuggestionsText(report).to_string()
}

/// One line per target with uncovered skills
pub fn render_gaps(gaps: &[GapEntry]) -> String {
    GapsText(gaps).to_string()
}

/// Simulated postings first, then stored requirements
pub fn render_trends(trends: &MarketTrends) -> String {
    format!(
        "{}{}",
        DemandText {
            heading: "Job Market Trends",
            rows: &trends.postings
        },
        DemandText {
            heading: "Stored Job Requirements",
            rows: &trends.requirements
        }
    )
}

struct ReportText<'a>(&'a AlignmentReport);

impl Display for ReportText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let precision = self.0.precision as usize;
        for course in &self.0.courses {
            writeln!(f, "Analyzing course: {} ({})", course.course_name, course.course_id)?;
            writeln!(f, "Industry Standards Alignment:")?;
            write_coverage(f, &course.standards, precision)?;
            writeln!(f, "Job Requirements Alignment:")?;
            write_coverage(f, &course.requirements, precision)?;
            writeln!(f)?;
        }
        SuggestionsText(self.0).fmt(f)
    }
}

fn write_coverage(f: &mut Formatter<'_>, rows: &[TargetCoverage], precision: usize) -> fmt::Result {
    if rows.is_empty() {
        writeln!(f, "  (none)")?;
    }
    for row in rows {
        writeln!(f, "- {}: {:.*}%", row.label, precision, row.percent)?;
    }
    Ok(())
}

struct SuggestionsText<'a>(&'a AlignmentReport);

impl Display for SuggestionsText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_aligned() {
            return writeln!(f, "{}", ALIGNED_MESSAGE);
        }

        writeln!(f, "Suggested Improvements:")?;
        writeln!(f, "Consider adding the following skills to your curriculum:")?;
        for skill in &self.0.suggested_skills {
            if skill.description.is_empty() {
                writeln!(f, "- {}", skill.name)?;
            } else {
                writeln!(f, "- {}: {}", skill.name, skill.description)?;
            }
        }
        Ok(())
    }
}

struct GapsText<'a>(&'a [GapEntry]);

impl Display for GapsText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "Curriculum Gaps: none");
        }

        writeln!(f, "Curriculum Gaps:")?;
        for gap in self.0 {
            let target = match gap.target_kind {
                EntityKind::JobRequirement => "job",
                _ => "standard",
            };
            let names: Vec<&str> = gap.missing.iter().map(|s| s.name.as_str()).collect();
            writeln!(
                f,
                "- Missing skills for {} {} ({}): {}",
                target,
                gap.label,
                gap.target_id,
                names.join(", ")
            )?;
        }
        Ok(())
    }
}

struct DemandText<'a> {
    heading: &'static str,
    rows: &'a [SkillDemand],
}

impl Display for DemandText<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (Top {} skills):", self.heading, self.rows.len())?;
        for demand in self.rows {
            writeln!(f, "  {:<24} {}", demand.skill, demand.count)?;
        }
        Ok(())
    }
}
