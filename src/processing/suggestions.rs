//! Prioritized, explained improvement suggestions

use crate::error::Result;
use crate::processing::taxonomy::{SkillCategory, SkillTaxonomy};
use crate::processing::text_processor::{is_whole_word, is_word_char};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 8;
const TOP_KEYWORDS: usize = 10;

const BUSINESS_KEYWORDS: &[&str] = &[
    "scale",
    "growth",
    "performance",
    "optimization",
    "architecture",
    "leadership",
    "team",
    "agile",
    "innovation",
    "digital transformation",
    "user experience",
    "data-driven",
    "cloud-native",
    "microservices",
    "automation",
    "security",
    "compliance",
    "integration",
    "analytics",
    "machine learning",
    "artificial intelligence",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    CvImprovement,
    SkillDevelopment,
    Keyword,
    Optimization,
    IndustrySpecific,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSuggestion {
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub suggestion: String,
    pub rationale: String,
    pub priority: Priority,
}

impl MatchSuggestion {
    fn new(
        suggestion_type: SuggestionType,
        suggestion: impl Into<String>,
        rationale: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            suggestion_type,
            suggestion: suggestion.into(),
            rationale: rationale.into(),
            priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Fintech,
    Healthcare,
    Ecommerce,
    Saas,
    Gaming,
    Iot,
    AiMl,
}

impl Industry {
    /// Detection order; the first industry with a keyword hit wins.
    pub const ALL: [Industry; 7] = [
        Industry::Fintech,
        Industry::Healthcare,
        Industry::Ecommerce,
        Industry::Saas,
        Industry::Gaming,
        Industry::Iot,
        Industry::AiMl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Fintech => "fintech",
            Industry::Healthcare => "healthcare",
            Industry::Ecommerce => "ecommerce",
            Industry::Saas => "saas",
            Industry::Gaming => "gaming",
            Industry::Iot => "iot",
            Industry::AiMl => "ai_ml",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Industry::Fintech => &[
                "financial", "banking", "payment", "trading", "blockchain", "cryptocurrency",
                "investment",
            ],
            Industry::Healthcare => &[
                "healthcare", "medical", "patient", "clinical", "hipaa", "fda", "pharma",
            ],
            Industry::Ecommerce => &[
                "ecommerce", "retail", "shopping", "marketplace", "inventory", "logistics",
            ],
            Industry::Saas => &["saas", "platform", "subscription", "tenant", "multi-tenant", "api"],
            Industry::Gaming => &["game", "gaming", "unity", "unreal", "mobile game", "multiplayer"],
            Industry::Iot => &["iot", "sensor", "embedded", "device", "hardware", "firmware"],
            Industry::AiMl => &[
                "artificial intelligence", "machine learning", "deep learning", "nlp",
                "computer vision",
            ],
        }
    }

    fn templates(&self) -> [&'static str; 3] {
        match self {
            Industry::Fintech => [
                "Highlight experience with financial regulations (PCI DSS, SOX, etc.)",
                "Emphasize security practices and data protection expertise",
                "Mention experience with high-volume transaction processing",
            ],
            Industry::Healthcare => [
                "Add HIPAA compliance and healthcare data handling experience",
                "Highlight security certifications and data privacy expertise",
                "Mention experience with healthcare systems integration",
            ],
            Industry::Ecommerce => [
                "Showcase work on checkout, catalog or order management systems",
                "Mention experience handling seasonal traffic peaks and inventory sync",
                "Highlight conversion or search relevance improvements you delivered",
            ],
            Industry::Saas => [
                "Emphasize experience building scalable, multi-tenant systems",
                "Highlight API design and integration expertise",
                "Add experience with application monitoring and analytics",
            ],
            Industry::Gaming => [
                "Highlight real-time or multiplayer systems you have built",
                "Mention performance profiling and frame-budget optimization work",
                "Link shipped titles, game jams or playable demos",
            ],
            Industry::Iot => [
                "Highlight embedded or firmware development experience",
                "Mention device fleet management and over-the-air update work",
                "Emphasize experience with sensor data ingestion at scale",
            ],
            Industry::AiMl => [
                "Showcase models you trained, evaluated and deployed to production",
                "Mention experience with data pipelines and feature engineering",
                "Highlight MLOps practices such as experiment tracking and model monitoring",
            ],
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First industry whose keywords appear at a word start in the job text.
pub fn detect_industry(job_text: &str) -> Option<Industry> {
    let lowered = job_text.to_lowercase();
    Industry::ALL.into_iter().find(|industry| {
        industry.keywords().iter().any(|keyword| {
            lowered.match_indices(keyword).any(|(start, _)| {
                lowered[..start]
                    .chars()
                    .next_back()
                    .map_or(true, |c| !is_word_char(c))
            })
        })
    })
}

/// Canned learning path for a skill, falling back to category templates.
pub fn learning_path(skill: &str, category: Option<SkillCategory>) -> String {
    let canned = match skill {
        "python" => Some("Complete a Python certification course and build REST API projects"),
        "react" => Some("Build 2-3 React applications with modern hooks and state management"),
        "aws" => Some(
            "Pursue AWS Cloud Practitioner certification and practice with free tier services",
        ),
        "kubernetes" => Some("Set up a local k8s cluster and deploy containerized applications"),
        "postgresql" => Some("Practice database design and optimization with real datasets"),
        "docker" => Some(
            "Containerize existing projects and learn Docker Compose for multi-service apps",
        ),
        "tensorflow" => {
            Some("Complete machine learning courses and implement neural network projects")
        }
        "django" => Some(
            "Build a full-stack web application with authentication and database integration",
        ),
        _ => None,
    };

    if let Some(text) = canned {
        return text.to_string();
    }

    match category {
        Some(SkillCategory::Programming) => {
            format!("Take online courses and build projects demonstrating {} proficiency", skill)
        }
        Some(SkillCategory::Frontend) => {
            format!("Create modern web applications showcasing {} best practices", skill)
        }
        Some(SkillCategory::Backend) => {
            format!("Develop API services and server-side applications using {}", skill)
        }
        Some(SkillCategory::Database) => {
            format!("Practice data modeling and query optimization with {}", skill)
        }
        Some(SkillCategory::Cloud) => {
            format!("Gain hands-on experience with {} through tutorials and free tier usage", skill)
        }
        Some(SkillCategory::DataAi) => {
            format!("Complete data science projects and courses focused on {}", skill)
        }
        Some(SkillCategory::Tools) => format!(
            "Integrate {} into your development workflow and document the process",
            skill
        ),
        _ => format!(
            "Develop expertise in {} through courses and practical projects",
            skill
        ),
    }
}

pub struct SuggestionGenerator {
    taxonomy: Arc<SkillTaxonomy>,
    keyword_matcher: AhoCorasick,
    keywords: Vec<String>,
    max_suggestions: usize,
}

impl SuggestionGenerator {
    pub fn new(taxonomy: Arc<SkillTaxonomy>, max_suggestions: usize) -> Result<Self> {
        let mut keywords: Vec<String> = taxonomy.skills().map(|s| s.name.clone()).collect();
        for keyword in BUSINESS_KEYWORDS {
            if !taxonomy.contains(keyword) {
                keywords.push(keyword.to_string());
            }
        }

        let keyword_matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&keywords)?;

        Ok(Self {
            taxonomy,
            keyword_matcher,
            keywords,
            max_suggestions,
        })
    }

    /// Technical and business keywords ranked by frequency, ties by first appearance.
    pub fn high_value_keywords(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut counts: Vec<(usize, usize)> = Vec::new();
        let mut slots: HashMap<usize, usize> = HashMap::new();

        for m in self.keyword_matcher.find_iter(&lowered) {
            if !is_whole_word(&lowered, m.start(), m.end()) {
                continue;
            }
            let pattern = m.pattern().as_usize();
            match slots.get(&pattern) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(pattern, counts.len());
                    counts.push((pattern, 1));
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(TOP_KEYWORDS)
            .map(|(pattern, _)| self.keywords[pattern].clone())
            .collect()
    }

    pub fn suggest(
        &self,
        must_have_missing: &[String],
        nice_to_have_missing: &[String],
        profile_skills: &[String],
        job_text: &str,
        weights: &HashMap<String, f64>,
        profile_text: &str,
    ) -> Vec<MatchSuggestion> {
        let mut suggestions = Vec::new();
        let must_sorted = by_weight(must_have_missing, weights);
        let nice_sorted = by_weight(nice_to_have_missing, weights);

        if !must_sorted.is_empty() {
            let top: Vec<&str> = must_sorted.iter().take(2).map(String::as_str).collect();
            suggestions.push(MatchSuggestion::new(
                SuggestionType::CvImprovement,
                format!("Prioritize gaining experience with {}", top.join(", ")),
                "These are the highest-weighted must-have requirements missing from your profile",
                Priority::Critical,
            ));

            for skill in must_sorted.iter().take(3) {
                suggestions.push(MatchSuggestion::new(
                    SuggestionType::SkillDevelopment,
                    learning_path(skill, self.taxonomy.category(skill)),
                    format!(
                        "Developing {} expertise will significantly improve your match score",
                        skill
                    ),
                    Priority::High,
                ));
            }
        }

        if !must_sorted.is_empty() || !nice_sorted.is_empty() {
            let showcase: Vec<&str> = must_sorted
                .iter()
                .take(2)
                .chain(nice_sorted.iter().take(2))
                .take(3)
                .map(String::as_str)
                .collect();
            suggestions.push(MatchSuggestion::new(
                SuggestionType::CvImprovement,
                format!(
                    "Create a portfolio project showcasing {} integration",
                    showcase.join(", ")
                ),
                "Hands-on projects demonstrate practical application of missing skills",
                Priority::High,
            ));
        }

        // Declared skills count as covered even when the profile text omits them.
        let mut profile_keywords = self.high_value_keywords(profile_text);
        profile_keywords.extend(profile_skills.iter().map(|s| s.to_lowercase()));
        let missing_keywords: Vec<String> = self
            .high_value_keywords(job_text)
            .into_iter()
            .filter(|k| !profile_keywords.contains(k))
            .take(3)
            .collect();

        if !missing_keywords.is_empty() {
            suggestions.push(MatchSuggestion::new(
                SuggestionType::Keyword,
                format!("Include these high-value terms: {}", missing_keywords.join(", ")),
                "These keywords appear prominently in the job description and will improve ATS matching",
                Priority::Medium,
            ));
        }

        if must_sorted.is_empty() && nice_sorted.len() <= 2 {
            suggestions.push(MatchSuggestion::new(
                SuggestionType::CvImprovement,
                "Quantify your achievements with specific metrics and business impact",
                "Strong technical alignment; focus on demonstrating results and value delivered",
                Priority::Medium,
            ));
            suggestions.push(MatchSuggestion::new(
                SuggestionType::CvImprovement,
                "Highlight leadership, mentoring, or cross-functional collaboration experience",
                "Senior roles value both technical skills and leadership capabilities",
                Priority::Medium,
            ));
            suggestions.push(MatchSuggestion::new(
                SuggestionType::Optimization,
                "Consider applying to senior or specialized roles that match your strong skill set",
                "Your profile shows strong alignment, so you may be qualified for higher-level positions",
                Priority::Low,
            ));
        }

        if let Some(industry) = detect_industry(job_text) {
            for template in industry.templates().into_iter().take(2) {
                suggestions.push(MatchSuggestion::new(
                    SuggestionType::IndustrySpecific,
                    template,
                    format!("Industry-specific requirement for {} roles", industry),
                    Priority::Medium,
                ));
            }
        }

        suggestions.sort_by_key(|s| s.priority);
        suggestions.truncate(self.max_suggestions);
        suggestions
    }
}

fn by_weight(skills: &[String], weights: &HashMap<String, f64>) -> Vec<String> {
    let mut sorted = skills.to_vec();
    sorted.sort_by(|a, b| {
        let wa = weights.get(a).copied().unwrap_or(1.0);
        let wb = weights.get(b).copied().unwrap_or(1.0);
        wb.total_cmp(&wa)
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> SuggestionGenerator {
        SuggestionGenerator::new(Arc::new(SkillTaxonomy::new()), DEFAULT_MAX_SUGGESTIONS).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_critical_suggestion_names_top_two() {
        let weights: HashMap<String, f64> =
            [("rust".to_string(), 2.5), ("go".to_string(), 1.2), ("aws".to_string(), 2.0)]
                .into_iter()
                .collect();
        let suggestions = generator().suggest(
            &strings(&["go", "rust", "aws"]),
            &[],
            &[],
            "We need rust, aws and go",
            &weights,
            "",
        );

        assert_eq!(suggestions[0].priority, Priority::Critical);
        assert_eq!(suggestions[0].suggestion, "Prioritize gaining experience with rust, aws");
        let paths = suggestions
            .iter()
            .filter(|s| s.suggestion_type == SuggestionType::SkillDevelopment)
            .count();
        assert_eq!(paths, 3);
    }

    #[test]
    fn test_keyword_gap_skips_declared_skills() {
        let suggestions = generator().suggest(
            &[],
            &[],
            &strings(&["terraform"]),
            "We use terraform and kafka daily",
            &HashMap::new(),
            "Platform engineer",
        );

        let keyword = suggestions
            .iter()
            .find(|s| s.suggestion_type == SuggestionType::Keyword)
            .unwrap();
        assert!(keyword.suggestion.contains("kafka"));
        assert!(!keyword.suggestion.contains("terraform"));
    }

    #[test]
    fn test_priorities_are_ordered_and_capped() {
        let suggestions = generator().suggest(
            &strings(&["python", "django", "kubernetes", "aws"]),
            &strings(&["redis", "kafka"]),
            &[],
            "Fintech payment platform using python, django, kubernetes, aws, redis, kafka, security and compliance",
            &HashMap::new(),
            "I write Java",
        );

        assert!(suggestions.len() <= DEFAULT_MAX_SUGGESTIONS);
        assert!(suggestions.windows(2).all(|w| w[0].priority <= w[1].priority));
    }

    #[test]
    fn test_strong_profile_suggestions() {
        let suggestions = generator().suggest(
            &[],
            &strings(&["redis"]),
            &strings(&["python"]),
            "python services",
            &HashMap::new(),
            "python services",
        );

        assert!(suggestions
            .iter()
            .any(|s| s.suggestion_type == SuggestionType::Optimization && s.priority == Priority::Low));
        assert!(suggestions.iter().all(|s| s.priority != Priority::Critical));
    }

    #[test]
    fn test_industry_detection_first_match_wins() {
        assert_eq!(detect_industry("A banking platform with an API"), Some(Industry::Fintech));
        assert_eq!(detect_industry("Clinical data tooling"), Some(Industry::Healthcare));
        assert_eq!(detect_industry("Rapid prototyping"), None);
    }

    #[test]
    fn test_industry_templates_limited_to_two() {
        let suggestions = generator().suggest(
            &[],
            &[],
            &[],
            "Embedded firmware for sensor devices",
            &HashMap::new(),
            "",
        );
        let industry = suggestions
            .iter()
            .filter(|s| s.suggestion_type == SuggestionType::IndustrySpecific)
            .count();
        assert_eq!(industry, 2);
    }

    #[test]
    fn test_high_value_keywords_ranking() {
        let keywords = generator().high_value_keywords(
            "Security first. We scale Python services; python and security at scale, more python.",
        );
        assert_eq!(keywords[0], "python");
        assert_eq!(keywords[1], "security");
        assert_eq!(keywords[2], "scale");
    }

    #[test]
    fn test_learning_path_fallbacks() {
        assert!(learning_path("python", Some(SkillCategory::Programming)).contains("Python certification"));
        assert!(learning_path("vue", Some(SkillCategory::Frontend)).contains("vue best practices"));
        assert!(learning_path("agile", Some(SkillCategory::Methodology)).starts_with("Develop expertise"));
        assert!(learning_path("cobol-ish", None).starts_with("Develop expertise"));
    }
}
