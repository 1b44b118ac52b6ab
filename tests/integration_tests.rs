//! Integration tests for career-mirror

use career_mirror::config::{Config, OutputFormat};
use career_mirror::input::manager::InputManager;
use career_mirror::output::formatter::ReportGenerator;
use career_mirror::output::report::{AggregateReporter, TrendDirection};
use career_mirror::processing::analyzer::AnalysisEngine;
use career_mirror::processing::document::{JobInput, MatchRecord, ProfileInput};
use career_mirror::processing::extractor::SkillExtractor;
use career_mirror::processing::requirements::RequirementTier;
use career_mirror::processing::scoring::{MatchScoreEngine, MatchStatus};
use career_mirror::processing::similarity::SimilarityScorer;
use career_mirror::processing::suggestions::SuggestionGenerator;
use career_mirror::processing::taxonomy::SkillTaxonomy;
use chrono::{Duration, TimeZone, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn score_engine() -> MatchScoreEngine {
    let taxonomy = Arc::new(SkillTaxonomy::new());
    let config = Config::default();
    MatchScoreEngine::new(
        taxonomy.clone(),
        SimilarityScorer::new(config.processing.similarity_cache_size),
        SuggestionGenerator::new(taxonomy, config.processing.max_suggestions).unwrap(),
        config.scoring,
    )
    .unwrap()
}

fn skills(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn records_with_scores(scores: &[f64]) -> Vec<MatchRecord> {
    let engine = score_engine();
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
    scores
        .iter()
        .enumerate()
        .map(|(i, score)| {
            let mut result = engine.score(&skills(&["python"]), "", &skills(&["python"]), &[], "", &[]);
            result.score = *score;
            MatchRecord {
                job_id: format!("job-{}", i),
                job_text: "Required: Python".to_string(),
                result,
                created_at: start + Duration::days(i as i64),
            }
        })
        .collect()
}

#[test]
fn test_concrete_scenario_scores_high() {
    let job_text = "Backend Engineer\nRequired: Python, Django\nNice to have: Redis\nMinimum 3 years of Python experience.";
    let result = score_engine().score(
        &skills(&["python", "django", "postgresql"]),
        "Software engineer with 5 years Python experience",
        &skills(&["python", "django"]),
        &skills(&["redis"]),
        job_text,
        &[],
    );

    assert_eq!(result.missing(RequirementTier::MustHave).count(), 0);
    let nice_missing: Vec<&str> = result
        .missing(RequirementTier::NiceToHave)
        .map(|r| r.skill.as_str())
        .collect();
    assert_eq!(nice_missing, vec!["redis"]);
    assert!(result.breakdown.experience_bonus == 2.0 || result.breakdown.experience_bonus == 5.0);
    assert!(result.score >= 75.0, "score was {}", result.score);
    assert!(result.score <= 100.0);
}

#[test]
fn test_identical_texts_with_full_coverage() {
    let text = "Data engineer. Required: Python, Spark. Nice to have: Airflow. Bonus: Kafka.";
    let result = score_engine().score(
        &skills(&["python", "apache-spark", "airflow", "kafka"]),
        text,
        &skills(&["python", "spark"]),
        &skills(&["airflow"]),
        text,
        &skills(&["kafka"]),
    );

    assert!(result.score >= 95.0, "score was {}", result.score);
    assert!(result.reasons.iter().all(|r| r.status == MatchStatus::Matched));
}

#[test]
fn test_empty_profile_has_zero_coverage() {
    let result = score_engine().score(
        &[],
        "",
        &skills(&["python", "django"]),
        &[],
        "Required: Python, Django",
        &[],
    );

    assert!(result
        .reasons
        .iter()
        .all(|r| r.status == MatchStatus::Missing && r.weight == 0.0));
    assert_eq!(result.breakdown.skill_match, 0.0);
    assert!(!result.suggestions.is_empty());
}

#[test]
fn test_classification_precedence_end_to_end() {
    let engine = AnalysisEngine::new(&Config::default()).unwrap();
    let requirements = engine.classify("Required: Python, Django\n\nNice to have: Python, Redis");

    assert!(requirements.must_have.contains(&"python".to_string()));
    assert!(requirements.must_have.contains(&"django".to_string()));
    assert!(!requirements.nice_to_have.contains(&"python".to_string()));
    assert!(requirements.nice_to_have.contains(&"redis".to_string()));
}

#[test]
fn test_report_for_empty_history() {
    let taxonomy = Arc::new(SkillTaxonomy::new());
    let extractor = Arc::new(SkillExtractor::new(taxonomy, 20).unwrap());
    let reporter = AggregateReporter::new(extractor, Config::default().report);

    let report = reporter.report("p1", &[]);
    assert_eq!(report.total_jobs_analyzed, 0);
    assert_eq!(report.average_match_score, 0.0);
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.to_lowercase().contains("no matches")));
}

#[test]
fn test_report_trends() {
    let engine = AnalysisEngine::new(&Config::default()).unwrap();

    let rising: Vec<f64> = (0..10).map(|i| 40.0 + 5.0 * i as f64).collect();
    let report = engine.build_report("p1", &records_with_scores(&rising));
    assert_eq!(report.match_trend.direction, TrendDirection::Improving);
    assert!(report.match_trend.change > 0.0);

    let report = engine.build_report("p1", &records_with_scores(&[70.0; 10]));
    assert_eq!(report.match_trend.direction, TrendDirection::Stable);
}

#[tokio::test]
async fn test_fixture_profile_against_fixture_jobs() {
    let mut manager = InputManager::new();
    let profile = manager
        .load_profile(Path::new("tests/fixtures/sample_profile.md"), vec![])
        .await
        .unwrap();
    let jobs = manager
        .load_jobs(&[
            PathBuf::from("tests/fixtures/backend_job.txt"),
            PathBuf::from("tests/fixtures/frontend_job.md"),
        ])
        .await
        .unwrap();

    let engine = AnalysisEngine::new(&Config::default()).unwrap();
    let analyses = engine.analyze_batch(&profile, &jobs).await;

    assert_eq!(analyses.len(), 2);
    assert_eq!(analyses[0].job_id, "backend_job");
    assert_eq!(analyses[0].job_title.as_deref(), Some("Senior Backend Engineer"));
    assert_eq!(
        analyses[0].requirements.must_have,
        vec!["python", "django", "postgresql"]
    );
    assert!(analyses[0].result.score > analyses[1].result.score);
    assert!(analyses
        .iter()
        .all(|a| (0.0..=100.0).contains(&a.result.score)));
}

#[tokio::test]
async fn test_history_file_round_trip_into_report() {
    let dir = tempfile::tempdir().unwrap();
    let engine = AnalysisEngine::new(&Config::default()).unwrap();
    let profile = ProfileInput::new("p1", "Python developer, 4 years experience with Django")
        .with_declared_skills(skills(&["python", "django"]));

    let now = Utc::now();
    let records: Vec<MatchRecord> = ["Required: Python, Go", "Required: Django, Go"]
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let job = JobInput::new(format!("job-{}", i), *text);
            MatchRecord {
                job_id: job.id.clone(),
                job_text: job.text.clone(),
                result: engine.analyze(&profile, &job).result,
                created_at: now - Duration::hours(i as i64),
            }
        })
        .collect();

    let path = dir.path().join("history.json");
    std::fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

    let loaded = InputManager::new().load_history(&path).await.unwrap();
    assert_eq!(loaded.len(), records.len());
    for (loaded, original) in loaded.iter().zip(&records) {
        assert_eq!(loaded.job_id, original.job_id);
        assert!((loaded.result.score - original.result.score).abs() < 1e-9);
    }

    let report = engine.build_report("p1", &loaded);
    assert_eq!(report.total_jobs_analyzed, 2);
    assert_eq!(report.skill_gaps[0].skill, "go");
    assert_eq!(report.skill_gaps[0].gap_frequency, 2);

    let markdown = ReportGenerator::new()
        .generate_profile_report(&report, OutputFormat::Markdown)
        .unwrap();
    assert!(markdown.contains("go"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown_fixture() {
    let mut manager = InputManager::new();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_profile.md"))
        .await
        .unwrap();

    assert!(text.contains("Jane Smith"));
    assert!(text.contains("- Python, Django, PostgreSQL"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_unsupported_and_missing_files() {
    let mut manager = InputManager::new();
    assert!(manager
        .extract_text(Path::new("tests/fixtures/unsupported.xyz"))
        .await
        .is_err());
    assert!(manager
        .extract_text(Path::new("tests/fixtures/nonexistent.txt"))
        .await
        .is_err());
}
