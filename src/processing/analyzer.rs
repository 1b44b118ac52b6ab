//! Analysis engine wiring the matching pipeline together

use crate::config::Config;
use crate::error::Result;
use crate::output::report::{AggregateReporter, ProfileReport};
use crate::processing::document::{JobInput, MatchRecord, ProfileInput};
use crate::processing::extractor::SkillExtractor;
use crate::processing::requirements::{RequirementClassifier, RequirementSet};
use crate::processing::scoring::{MatchResult, MatchScoreEngine};
use crate::processing::similarity::SimilarityScorer;
use crate::processing::suggestions::SuggestionGenerator;
use crate::processing::taxonomy::SkillTaxonomy;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Coordinates classification, scoring and reporting over a shared taxonomy.
pub struct AnalysisEngine {
    taxonomy: Arc<SkillTaxonomy>,
    extractor: Arc<SkillExtractor>,
    classifier: RequirementClassifier,
    scorer: MatchScoreEngine,
    reporter: AggregateReporter,
    config: Config,
}

/// Outcome of matching one profile against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub job_id: String,
    pub job_title: Option<String>,
    pub requirements: RequirementSet,
    pub result: MatchResult,
}

#[derive(Debug, Clone)]
pub struct AnalysisEngineStats {
    pub taxonomy_skills: usize,
    pub taxonomy_aliases: usize,
    pub similarity_cache_entries: u64,
    pub batch_size: usize,
}

impl AnalysisEngine {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let taxonomy = Arc::new(SkillTaxonomy::new());
        let extractor = Arc::new(SkillExtractor::new(
            taxonomy.clone(),
            config.processing.context_window,
        )?);
        let classifier = RequirementClassifier::new(extractor.clone())?;

        let similarity = if config.processing.enable_caching {
            SimilarityScorer::new(config.processing.similarity_cache_size)
        } else {
            SimilarityScorer::uncached()
        };
        let suggestions =
            SuggestionGenerator::new(taxonomy.clone(), config.processing.max_suggestions)?;
        let scorer = MatchScoreEngine::new(
            taxonomy.clone(),
            similarity,
            suggestions,
            config.scoring.clone(),
        )?;
        let reporter = AggregateReporter::new(extractor.clone(), config.report.clone());

        debug!("Analysis engine ready with {} taxonomy skills", taxonomy.len());

        Ok(Self {
            taxonomy,
            extractor,
            classifier,
            scorer,
            reporter,
            config: config.clone(),
        })
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    pub fn extractor(&self) -> &SkillExtractor {
        &self.extractor
    }

    pub fn scorer(&self) -> &MatchScoreEngine {
        &self.scorer
    }

    pub fn classify(&self, job_text: &str) -> RequirementSet {
        self.classifier.classify(job_text)
    }

    /// Declared skills plus skills found in the profile text, normalized, first-seen order.
    pub fn profile_skills(&self, profile: &ProfileInput) -> Vec<String> {
        let mut skills: Vec<String> = Vec::new();
        let declared = profile
            .declared_skills
            .iter()
            .map(|s| self.taxonomy.normalize(s).0);
        let extracted = self.extractor.extract_unique(&profile.text).into_iter();

        for skill in declared.chain(extracted) {
            if !skill.is_empty() && !skills.contains(&skill) {
                skills.push(skill);
            }
        }
        skills
    }

    pub fn analyze(&self, profile: &ProfileInput, job: &JobInput) -> JobAnalysis {
        let skills = self.profile_skills(profile);
        self.analyze_with_skills(&skills, profile, job)
    }

    fn analyze_with_skills(
        &self,
        skills: &[String],
        profile: &ProfileInput,
        job: &JobInput,
    ) -> JobAnalysis {
        let requirements = self.classifier.classify(&job.text);
        let result = self
            .scorer
            .score_requirements(skills, &profile.text, &requirements, &job.text);

        JobAnalysis {
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            requirements,
            result,
        }
    }

    /// Score many jobs against one profile, yielding between chunks.
    pub async fn analyze_batch(&self, profile: &ProfileInput, jobs: &[JobInput]) -> Vec<JobAnalysis> {
        self.analyze_batch_with_progress(profile, jobs, |_| {}).await
    }

    /// Like `analyze_batch`, reporting the number of finished jobs after each one.
    pub async fn analyze_batch_with_progress<F>(
        &self,
        profile: &ProfileInput,
        jobs: &[JobInput],
        mut on_progress: F,
    ) -> Vec<JobAnalysis>
    where
        F: FnMut(usize),
    {
        let start = Instant::now();
        let skills = self.profile_skills(profile);
        let mut results = Vec::with_capacity(jobs.len());

        for chunk in jobs.chunks(self.config.processing.batch_size.max(1)) {
            for job in chunk {
                results.push(self.analyze_with_skills(&skills, profile, job));
                on_progress(results.len());
            }
            tokio::task::yield_now().await;
        }

        info!(
            "Batch of {} jobs scored in {}ms",
            results.len(),
            start.elapsed().as_millis()
        );
        results
    }

    pub fn build_report(&self, profile_id: &str, history: &[MatchRecord]) -> ProfileReport {
        self.reporter.report(profile_id, history)
    }

    pub fn get_stats(&self) -> AnalysisEngineStats {
        AnalysisEngineStats {
            taxonomy_skills: self.taxonomy.len(),
            taxonomy_aliases: self.taxonomy.alias_count(),
            similarity_cache_entries: self.scorer.similarity_scorer().cached_entries(),
            batch_size: self.config.processing.batch_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::scoring::MatchStatus;

    fn engine() -> AnalysisEngine {
        AnalysisEngine::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = Config::default();
        config.scoring.bonus_weight = 0.5;
        assert!(AnalysisEngine::new(&config).is_err());
    }

    #[test]
    fn test_profile_skills_merge_declared_and_extracted() {
        let profile = ProfileInput::new("p1", "Backend developer.\nSkills: Django, Postgres")
            .with_declared_skills(vec!["Python".to_string(), "django".to_string()]);
        let skills = engine().profile_skills(&profile);

        assert_eq!(skills[0], "python");
        assert_eq!(skills[1], "django");
        assert!(skills.contains(&"postgresql".to_string()));
        assert_eq!(skills.iter().filter(|s| *s == "django").count(), 1);
    }

    #[test]
    fn test_analyze_single_job() {
        let profile = ProfileInput::new("p1", "Rust engineer, 6 years experience with Rust and Kafka");
        let job = JobInput::new(
            "j1",
            "Platform Engineer\nRequired: Rust, Kafka\nNice to have: Kubernetes\nMinimum 3 years of experience",
        );

        let analysis = engine().analyze(&profile, &job);
        assert_eq!(analysis.job_id, "j1");
        assert_eq!(analysis.job_title.as_deref(), Some("Platform Engineer"));
        assert!(analysis
            .result
            .reasons
            .iter()
            .any(|r| r.skill == "kubernetes" && r.status == MatchStatus::Missing));
        assert!(analysis.result.score > 50.0);
    }

    #[tokio::test]
    async fn test_batch_preserves_order_across_chunks() {
        let mut config = Config::default();
        config.processing.batch_size = 2;
        let engine = AnalysisEngine::new(&config).unwrap();

        let profile = ProfileInput::new("p1", "Python developer");
        let jobs: Vec<JobInput> = (0..5)
            .map(|i| JobInput::new(format!("job-{}", i), "Required: Python, Docker"))
            .collect();

        let mut seen = Vec::new();
        let results = engine
            .analyze_batch_with_progress(&profile, &jobs, |done| seen.push(done))
            .await;

        let ids: Vec<&str> = results.iter().map(|r| r.job_id.as_str()).collect();
        assert_eq!(ids, vec!["job-0", "job-1", "job-2", "job-3", "job-4"]);
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert!(results.windows(2).all(|w| w[0].result == w[1].result));
    }
}
