//! Weighted, explainable match scoring

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::processing::experience::ExperienceAnalyzer;
use crate::processing::importance::ImportanceWeigher;
use crate::processing::requirements::{RequirementSet, RequirementTier};
use crate::processing::similarity::SimilarityScorer;
use crate::processing::suggestions::{MatchSuggestion, SuggestionGenerator};
use crate::processing::taxonomy::SkillTaxonomy;
use crate::processing::text_processor::round2;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Missing,
}

/// One skill's contribution to the score. Missing skills always carry weight 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReason {
    pub skill: String,
    pub category: RequirementTier,
    pub status: MatchStatus,
    pub weight: f64,
}

/// Percentage contribution of each signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skill_match: f64,
    pub text_similarity: f64,
    pub experience_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    pub reasons: Vec<MatchReason>,
    pub suggestions: Vec<MatchSuggestion>,
    pub breakdown: ScoreBreakdown,
}

impl MatchResult {
    pub fn matched(&self) -> impl Iterator<Item = &MatchReason> {
        self.reasons
            .iter()
            .filter(|r| r.status == MatchStatus::Matched)
    }

    pub fn missing(&self, tier: RequirementTier) -> impl Iterator<Item = &MatchReason> {
        self.reasons
            .iter()
            .filter(move |r| r.status == MatchStatus::Missing && r.category == tier)
    }
}

pub struct MatchScoreEngine {
    taxonomy: Arc<SkillTaxonomy>,
    weigher: ImportanceWeigher,
    similarity: SimilarityScorer,
    experience: ExperienceAnalyzer,
    suggestions: SuggestionGenerator,
    weights: ScoringConfig,
}

impl MatchScoreEngine {
    pub fn new(
        taxonomy: Arc<SkillTaxonomy>,
        similarity: SimilarityScorer,
        suggestions: SuggestionGenerator,
        weights: ScoringConfig,
    ) -> Result<Self> {
        Ok(Self {
            weigher: ImportanceWeigher::new(taxonomy.clone()),
            experience: ExperienceAnalyzer::new()?,
            taxonomy,
            similarity,
            suggestions,
            weights,
        })
    }

    pub fn similarity_scorer(&self) -> &SimilarityScorer {
        &self.similarity
    }

    pub fn score_requirements(
        &self,
        profile_skills: &[String],
        profile_text: &str,
        requirements: &RequirementSet,
        job_text: &str,
    ) -> MatchResult {
        self.score(
            profile_skills,
            profile_text,
            &requirements.must_have,
            &requirements.nice_to_have,
            job_text,
            &requirements.bonus,
        )
    }

    /// Score a profile against a job's tiered requirements.
    pub fn score(
        &self,
        profile_skills: &[String],
        profile_text: &str,
        must_have: &[String],
        nice_to_have: &[String],
        job_text: &str,
        bonus: &[String],
    ) -> MatchResult {
        let profile: HashSet<String> = profile_skills
            .iter()
            .map(|s| self.taxonomy.normalize(s).0)
            .collect();

        let mut tiers = RequirementSet {
            must_have: self.normalize_all(must_have),
            nice_to_have: self.normalize_all(nice_to_have),
            bonus: self.normalize_all(bonus),
        };
        tiers.resolve_overlaps();

        let importance = self.weigher.weights(&tiers.all_skills(), job_text);

        let budgets = [
            (RequirementTier::MustHave, self.weights.must_have_weight),
            (RequirementTier::NiceToHave, self.weights.nice_to_have_weight),
            (RequirementTier::Bonus, self.weights.bonus_weight),
        ];

        let mut reasons = Vec::new();
        let mut total_weight = 0.0;
        let mut achieved_weight = 0.0;
        let mut must_missing = Vec::new();
        let mut nice_missing = Vec::new();

        for (tier, budget) in budgets {
            let skills = tiers.tier(tier);
            if skills.is_empty() {
                continue;
            }

            let (matched, missing): (Vec<&String>, Vec<&String>) =
                skills.iter().partition(|s| profile.contains(*s));

            for skill in matched {
                let share = importance.get(skill).copied().unwrap_or(1.0) * budget
                    / skills.len() as f64;
                total_weight += share;
                achieved_weight += share;
                reasons.push(MatchReason {
                    skill: skill.clone(),
                    category: tier,
                    status: MatchStatus::Matched,
                    weight: share,
                });
            }

            for skill in missing {
                let share = importance.get(skill).copied().unwrap_or(1.0) * budget
                    / skills.len() as f64;
                total_weight += share;
                reasons.push(MatchReason {
                    skill: skill.clone(),
                    category: tier,
                    status: MatchStatus::Missing,
                    weight: 0.0,
                });
                match tier {
                    RequirementTier::MustHave => must_missing.push(skill.clone()),
                    RequirementTier::NiceToHave => nice_missing.push(skill.clone()),
                    RequirementTier::Bonus => {}
                }
            }
        }

        let coverage = achieved_weight / f64::max(total_weight, 1.0);

        let similarity = match self.similarity.try_similarity(profile_text, job_text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Text similarity unavailable, using 0.0: {}", e);
                0.0
            }
        };
        let similarity_bonus = similarity * self.weights.similarity_weight;
        let experience_bonus = self.experience.adjustment(profile_text, job_text);

        let score = round2(((coverage + similarity_bonus + experience_bonus) * 100.0).clamp(0.0, 100.0));

        let suggestions = self.suggestions.suggest(
            &must_missing,
            &nice_missing,
            profile_skills,
            job_text,
            &importance,
            profile_text,
        );

        info!(
            "Match score: {:.2} (skill: {:.2}, similarity: {:.2}, experience: {:.2})",
            score, coverage, similarity_bonus, experience_bonus
        );

        MatchResult {
            score,
            reasons,
            suggestions,
            breakdown: ScoreBreakdown {
                skill_match: round2(coverage * 100.0),
                text_similarity: round2(similarity_bonus * 100.0),
                experience_bonus: round2(experience_bonus * 100.0),
            },
        }
    }

    fn normalize_all(&self, skills: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(skills.len());
        for skill in skills {
            let (name, _) = self.taxonomy.normalize(skill);
            if !name.is_empty() && !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::suggestions::DEFAULT_MAX_SUGGESTIONS;

    fn engine() -> MatchScoreEngine {
        let taxonomy = Arc::new(SkillTaxonomy::new());
        MatchScoreEngine::new(
            taxonomy.clone(),
            SimilarityScorer::uncached(),
            SuggestionGenerator::new(taxonomy, DEFAULT_MAX_SUGGESTIONS).unwrap(),
            ScoringConfig::default(),
        )
        .unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_profile_skills_means_zero_coverage() {
        let result = engine().score(
            &[],
            "",
            &strings(&["python", "django"]),
            &[],
            "Required: Python, Django",
            &[],
        );

        let must: Vec<&MatchReason> = result.missing(RequirementTier::MustHave).collect();
        assert_eq!(must.len(), 2);
        assert!(must.iter().all(|r| r.weight == 0.0));
        assert_eq!(result.breakdown.skill_match, 0.0);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_reasons_cover_every_tier_skill() {
        let result = engine().score(
            &strings(&["python", "kafka"]),
            "python and kafka",
            &strings(&["python", "go"]),
            &strings(&["redis"]),
            "python go redis kafka",
            &strings(&["kafka", "graphql"]),
        );

        assert_eq!(result.reasons.len(), 5);
        let bonus_missing: Vec<&MatchReason> = result.missing(RequirementTier::Bonus).collect();
        assert_eq!(bonus_missing.len(), 1);
        assert_eq!(bonus_missing[0].skill, "graphql");
        assert!(result.matched().all(|r| r.weight > 0.0));
    }

    #[test]
    fn test_aliases_match_canonical_requirements() {
        let result = engine().score(
            &strings(&["JS", "k8s"]),
            "",
            &strings(&["javascript", "kubernetes"]),
            &[],
            "javascript and kubernetes",
            &[],
        );
        assert_eq!(result.matched().count(), 2);
    }

    #[test]
    fn test_overlapping_tiers_are_resolved() {
        let result = engine().score(
            &[],
            "",
            &strings(&["python"]),
            &strings(&["python", "redis"]),
            "python redis",
            &[],
        );
        assert_eq!(
            result
                .reasons
                .iter()
                .filter(|r| r.skill == "python")
                .count(),
            1
        );
    }

    #[test]
    fn test_score_is_deterministic_and_bounded() {
        let engine = engine();
        let run = || {
            engine.score(
                &strings(&["python", "docker"]),
                "10 years experience with python and docker",
                &strings(&["python"]),
                &strings(&["docker"]),
                "python docker, minimum 2 years",
                &[],
            )
        };
        let first = run();
        let second = run();
        assert_eq!(first, second);
        assert!((0.0..=100.0).contains(&first.score));
        assert_eq!(first.score, 100.0);
    }
}
