//! Job Market Trends
//!
//! Counts how often each skill is demanded across job postings. Postings are
//! either the built-in simulated set or derived from stored job requirements;
//! nothing is fetched from the network.

use crate::catalog::Catalog;
use crate::types::JobRequirement;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub required_skills: Vec<String>,
}

impl JobPosting {
    pub fn new(title: &str, required_skills: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            required_skills: required_skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Posting for a stored requirement, naming skills by their display name
    pub fn from_requirement(requirement: &JobRequirement, catalog: &Catalog) -> Self {
        Self {
            title: requirement.title.clone(),
            required_skills: requirement
                .skills
                .iter()
                .map(|id| catalog.skill_name(id).to_string())
                .collect(),
        }
    }
}

/// Number of postings demanding a skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDemand {
    pub skill: String,
    pub count: usize,
}

/// Simulated postings used when no live market data is available
pub fn sample_postings() -> Vec<JobPosting> {
    vec![
        JobPosting::new(
            "Software Developer",
            &["python", "javascript", "git", "agile", "react", "django"],
        ),
        JobPosting::new(
            "Data Analyst",
            &["python", "sql", "data analysis", "statistics", "tableau", "excel"],
        ),
        JobPosting::new(
            "DevOps Engineer",
            &["linux", "aws", "docker", "kubernetes", "jenkins", "python"],
        ),
        JobPosting::new(
            "Full Stack Developer",
            &["javascript", "react", "node.js", "mongodb", "express", "git"],
        ),
        JobPosting::new(
            "Machine Learning Engineer",
            &["python", "tensorflow", "scikit-learn", "numpy", "pandas", "keras"],
        ),
    ]
}

/// Most demanded skills, highest count first.
///
/// Skill names are compared case-insensitively and reported lower-cased. A
/// skill listed twice in one posting counts once. Ties are broken by name so
/// the output is deterministic.
pub fn analyze_job_market_trends(postings: &[JobPosting], limit: usize) -> Vec<SkillDemand> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for posting in postings {
        let mut seen: Vec<String> = posting
            .required_skills
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        seen.sort();
        seen.dedup();
        for skill in seen {
            *counts.entry(skill).or_insert(0) += 1;
        }
    }

    let mut demand: Vec<SkillDemand> = counts
        .into_iter()
        .map(|(skill, count)| SkillDemand { skill, count })
        .collect();
    demand.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    demand.truncate(limit);

    log::debug!("[MARKET] {} postings, reporting top {} skills", postings.len(), demand.len());
    demand
}
