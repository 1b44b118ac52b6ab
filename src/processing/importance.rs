//! Per-skill importance weighting from job description context

use crate::processing::taxonomy::{SkillCategory, SkillTaxonomy};
use crate::processing::text_processor::{find_whole_word, split_clauses};
use std::collections::HashMap;
use std::sync::Arc;

pub const MAX_WEIGHT: f64 = 3.0;

const EMPHASIS_KEYWORDS: &[&str] = &[
    "critical", "crucial", "essential", "key", "important", "core", "primary", "main",
];

pub struct ImportanceWeigher {
    taxonomy: Arc<SkillTaxonomy>,
}

impl ImportanceWeigher {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn weights(&self, skills: &[String], job_text: &str) -> HashMap<String, f64> {
        let lowered = job_text.to_lowercase();
        skills
            .iter()
            .map(|skill| (skill.clone(), self.weight_lowered(skill, &lowered)))
            .collect()
    }

    pub fn weight(&self, skill: &str, job_text: &str) -> f64 {
        self.weight_lowered(skill, &job_text.to_lowercase())
    }

    fn weight_lowered(&self, skill: &str, job_lower: &str) -> f64 {
        let skill = skill.trim().to_lowercase();
        let occurrences = find_whole_word(job_lower, &skill);

        let frequency = (1.0 + 0.2 * occurrences.len() as f64).min(2.0);
        let emphasis = if emphasized(&skill, job_lower) { 1.5 } else { 1.0 };
        let position = match occurrences.first() {
            Some(&offset) if !job_lower.is_empty() => {
                1.2 - 0.4 * (offset as f64 / job_lower.len() as f64)
            }
            _ => 1.0,
        };
        let category = self
            .taxonomy
            .category(&skill)
            .map_or(1.0, category_factor);

        (frequency * emphasis * position * category).clamp(0.0, MAX_WEIGHT)
    }
}

fn emphasized(skill: &str, job_lower: &str) -> bool {
    split_clauses(job_lower).into_iter().any(|clause| {
        !find_whole_word(clause, skill).is_empty()
            && EMPHASIS_KEYWORDS
                .iter()
                .any(|keyword| !find_whole_word(clause, keyword).is_empty())
    })
}

pub fn category_factor(category: SkillCategory) -> f64 {
    match category {
        SkillCategory::Programming => 1.3,
        SkillCategory::Backend | SkillCategory::Frontend => 1.2,
        SkillCategory::Database
        | SkillCategory::Cloud
        | SkillCategory::DataAi
        | SkillCategory::Architecture => 1.1,
        SkillCategory::Methodology => 0.9,
        SkillCategory::Tools => 0.8,
    }
}
