//! Console, JSON and Markdown rendering for match results and profile reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{GapImpact, ProfileReport, TrendDirection};
use crate::processing::analyzer::JobAnalysis;
use crate::processing::requirements::RequirementTier;
use crate::processing::scoring::{MatchReason, MatchStatus};
use crate::processing::suggestions::Priority;
use colored::{Color, Colorize};
use std::path::Path;

/// Renders engine output in one format.
pub trait OutputFormatter {
    fn format_match(&self, analysis: &JobAnalysis) -> Result<String>;
    fn format_batch(&self, analyses: &[JobAnalysis]) -> Result<String>;
    fn format_profile_report(&self, report: &ProfileReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches to the formatter for the requested format.
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn tier_label(tier: RequirementTier) -> &'static str {
    match tier {
        RequirementTier::MustHave => "Must have",
        RequirementTier::NiceToHave => "Nice to have",
        RequirementTier::Bonus => "Bonus",
    }
}

fn score_label(score: f64) -> (&'static str, Color) {
    match score {
        s if s >= 90.0 => ("EXCELLENT", Color::Green),
        s if s >= 75.0 => ("STRONG", Color::BrightGreen),
        s if s >= 60.0 => ("GOOD", Color::Yellow),
        s if s >= 40.0 => ("FAIR", Color::BrightYellow),
        _ => ("POOR", Color::Red),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            use_colors,
            detailed,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = score_label(score);
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_priority_icon(&self, priority: Priority) -> &'static str {
        match (self.use_colors, priority) {
            (true, Priority::Critical) => "🚨",
            (true, Priority::High) => "⚠️",
            (true, Priority::Medium) => "📋",
            (true, Priority::Low) => "💡",
            (false, Priority::Critical) => "[!]",
            (false, Priority::High) => "[*]",
            (false, Priority::Medium) => "[-]",
            (false, Priority::Low) => "[+]",
        }
    }

    fn format_reason(&self, reason: &MatchReason) -> String {
        match reason.status {
            MatchStatus::Matched => format!(
                "  {} {} ({}, +{:.1} pts)\n",
                self.colorize("✓", Color::Green),
                reason.skill,
                tier_label(reason.category),
                reason.weight * 100.0
            ),
            MatchStatus::Missing => format!(
                "  {} {} ({})\n",
                self.colorize("✗", Color::Red),
                reason.skill,
                tier_label(reason.category)
            ),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_match(&self, analysis: &JobAnalysis) -> Result<String> {
        let result = &analysis.result;
        let mut output = String::new();

        output.push_str(&self.format_header(
            &format!(
                "🎯 MATCH: {} ({})",
                analysis.job_title.as_deref().unwrap_or("Untitled job"),
                analysis.job_id
            ),
            1,
        ));
        output.push_str(&format!(
            "Score: {:.2}/100 {}\n",
            result.score,
            self.format_score_badge(result.score)
        ));

        output.push_str(&self.format_header("Score Breakdown", 2));
        output.push_str(&format!("🧩 Skill coverage:  {:.2}%\n", result.breakdown.skill_match));
        output.push_str(&format!("📄 Text similarity: {:.2}%\n", result.breakdown.text_similarity));
        output.push_str(&format!("⏳ Experience:      {:+.2}%\n", result.breakdown.experience_bonus));

        output.push_str(&self.format_header("Skills", 2));
        if result.reasons.is_empty() {
            output.push_str("  No skill requirements detected in the job description\n");
        }
        for reason in &result.reasons {
            output.push_str(&self.format_reason(reason));
        }

        if self.detailed {
            let requirements = &analysis.requirements;
            output.push_str(&self.format_header("Detected Requirements", 3));
            output.push_str(&format!("Must have:    {}\n", requirements.must_have.join(", ")));
            output.push_str(&format!("Nice to have: {}\n", requirements.nice_to_have.join(", ")));
            output.push_str(&format!("Bonus:        {}\n", requirements.bonus.join(", ")));
        }

        if !result.suggestions.is_empty() {
            output.push_str(&self.format_header("Suggestions", 2));
            for (i, suggestion) in result.suggestions.iter().enumerate() {
                output.push_str(&format!(
                    "{}. {} {}\n",
                    i + 1,
                    self.format_priority_icon(suggestion.priority),
                    self.colorize(&suggestion.suggestion, Color::Cyan)
                ));
                if self.detailed {
                    output.push_str(&format!("     {}\n", suggestion.rationale));
                }
            }
        }

        Ok(output)
    }

    fn format_batch(&self, analyses: &[JobAnalysis]) -> Result<String> {
        let mut output = self.format_header(&format!("📊 BATCH RESULTS ({} jobs)", analyses.len()), 1);

        let mut ranked: Vec<&JobAnalysis> = analyses.iter().collect();
        ranked.sort_by(|a, b| b.result.score.total_cmp(&a.result.score));

        for (i, analysis) in ranked.iter().enumerate() {
            let missing = analysis
                .result
                .missing(RequirementTier::MustHave)
                .count();
            output.push_str(&format!(
                "{:>3}. {:>6.2} {} {} ({} must-have missing)\n",
                i + 1,
                analysis.result.score,
                self.format_score_badge(analysis.result.score),
                analysis.job_title.as_deref().unwrap_or(&analysis.job_id),
                missing
            ));
        }

        if self.detailed {
            for analysis in ranked {
                output.push_str(&self.format_match(analysis)?);
            }
        }

        Ok(output)
    }

    fn format_profile_report(&self, report: &ProfileReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("📈 PROFILE REPORT: {}", report.profile_id), 1));
        output.push_str(&format!(
            "Generated: {}\n",
            report.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("Jobs analyzed: {}\n", report.total_jobs_analyzed));

        if report.total_jobs_analyzed > 0 {
            output.push_str(&format!(
                "Average score: {:.2} {} | Median: {:.2}\n",
                report.average_match_score,
                self.format_score_badge(report.average_match_score),
                report.median_match_score
            ));
            let dist = &report.match_distribution;
            output.push_str(&format!(
                "Distribution: {} excellent, {} good, {} poor\n",
                dist.excellent, dist.good, dist.poor
            ));

            let trend = &report.match_trend;
            let trend_color = match trend.direction {
                TrendDirection::Improving => Color::Green,
                TrendDirection::Declining => Color::Red,
                _ => Color::White,
            };
            output.push_str(&format!(
                "Trend: {} ({:+.2})\n",
                self.colorize(&trend.direction.to_string(), trend_color),
                trend.change
            ));
        }

        if !report.top_skills.is_empty() {
            output.push_str(&self.format_header("Top Skills", 2));
            for skill in &report.top_skills {
                output.push_str(&format!(
                    "  💪 {} matched in {} jobs ({:.0}%)\n",
                    skill.skill,
                    skill.match_frequency,
                    skill.match_rate * 100.0
                ));
            }
        }

        if !report.skill_gaps.is_empty() {
            output.push_str(&self.format_header("Skill Gaps", 2));
            for gap in &report.skill_gaps {
                let impact = match gap.impact {
                    GapImpact::Critical => self.colorize("critical", Color::Red),
                    GapImpact::High => self.colorize("high", Color::Yellow),
                    GapImpact::Medium => "medium".to_string(),
                };
                output.push_str(&format!(
                    "  🔧 {} missing in {} jobs, impact {}, priority {}\n",
                    gap.skill, gap.gap_frequency, impact, gap.priority
                ));
            }
        }

        if !report.trending_skills.is_empty() {
            output.push_str(&self.format_header("Trending Skills", 2));
            for trending in &report.trending_skills {
                output.push_str(&format!(
                    "  📊 {} in {:.0}% of recent jobs\n",
                    trending.skill,
                    trending.trend_score * 100.0
                ));
            }
        }

        output.push_str(&self.format_header("Recommendations", 2));
        for recommendation in &report.recommendations {
            output.push_str(&format!("  {}\n", recommendation));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_match(&self, analysis: &JobAnalysis) -> Result<String> {
        self.to_json(analysis)
    }

    fn format_batch(&self, analyses: &[JobAnalysis]) -> Result<String> {
        self.to_json(&analyses)
    }

    fn format_profile_report(&self, report: &ProfileReport) -> Result<String> {
        self.to_json(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: f64) -> &'static str {
        match score_label(score).0 {
            "EXCELLENT" => "🟢 Excellent",
            "STRONG" => "🟡 Strong",
            "GOOD" => "🟠 Good",
            "FAIR" => "🔴 Fair",
            _ => "🔴 Poor",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_match(&self, analysis: &JobAnalysis) -> Result<String> {
        let result = &analysis.result;
        let mut output = format!(
            "# 🎯 Match Report: {}\n\n",
            analysis.job_title.as_deref().unwrap_or("Untitled job")
        );

        if self.include_metadata {
            output.push_str(&format!("**Job ID:** `{}`\n\n", analysis.job_id));
        }

        output.push_str(&format!(
            "**Score:** {:.2}/100 {}\n\n",
            result.score,
            Self::markdown_score_badge(result.score)
        ));

        output.push_str("## Score Breakdown\n\n");
        output.push_str("| Component | Contribution |\n");
        output.push_str("|-----------|--------------|\n");
        output.push_str(&format!("| Skill coverage | {:.2}% |\n", result.breakdown.skill_match));
        output.push_str(&format!("| Text similarity | {:.2}% |\n", result.breakdown.text_similarity));
        output.push_str(&format!("| Experience | {:+.2}% |\n\n", result.breakdown.experience_bonus));

        output.push_str("## Skills\n\n");
        output.push_str("| Skill | Tier | Status | Points |\n");
        output.push_str("|-------|------|--------|--------|\n");
        for reason in &result.reasons {
            let status = match reason.status {
                MatchStatus::Matched => "✅ matched",
                MatchStatus::Missing => "❌ missing",
            };
            output.push_str(&format!(
                "| {} | {} | {} | {:.1} |\n",
                reason.skill,
                tier_label(reason.category),
                status,
                reason.weight * 100.0
            ));
        }

        if !result.suggestions.is_empty() {
            output.push_str("\n## Suggestions\n\n");
            for (i, suggestion) in result.suggestions.iter().enumerate() {
                output.push_str(&format!(
                    "{}. **[{}]** {}\n   - _{}_\n",
                    i + 1,
                    suggestion.priority,
                    suggestion.suggestion,
                    suggestion.rationale
                ));
            }
        }

        Ok(output)
    }

    fn format_batch(&self, analyses: &[JobAnalysis]) -> Result<String> {
        let mut output = format!("# 📊 Batch Results ({} jobs)\n\n", analyses.len());
        output.push_str("| Rank | Job | Score | Must-have missing |\n");
        output.push_str("|------|-----|-------|-------------------|\n");

        let mut ranked: Vec<&JobAnalysis> = analyses.iter().collect();
        ranked.sort_by(|a, b| b.result.score.total_cmp(&a.result.score));
        for (i, analysis) in ranked.iter().enumerate() {
            let missing: Vec<&str> = analysis
                .result
                .missing(RequirementTier::MustHave)
                .map(|r| r.skill.as_str())
                .collect();
            output.push_str(&format!(
                "| {} | {} | {:.2} | {} |\n",
                i + 1,
                analysis.job_title.as_deref().unwrap_or(&analysis.job_id),
                analysis.result.score,
                missing.join(", ")
            ));
        }

        Ok(output)
    }

    fn format_profile_report(&self, report: &ProfileReport) -> Result<String> {
        let mut output = format!("# 📈 Profile Report: {}\n\n", report.profile_id);

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {}\n\n",
                report.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!("- **Jobs analyzed:** {}\n", report.total_jobs_analyzed));
        output.push_str(&format!(
            "- **Average score:** {:.2} {}\n",
            report.average_match_score,
            Self::markdown_score_badge(report.average_match_score)
        ));
        output.push_str(&format!("- **Median score:** {:.2}\n", report.median_match_score));
        output.push_str(&format!(
            "- **Trend:** {} ({:+.2})\n\n",
            report.match_trend.direction, report.match_trend.change
        ));

        if !report.top_skills.is_empty() {
            output.push_str("## Top Skills\n\n| Skill | Matches | Rate |\n|-------|---------|------|\n");
            for skill in &report.top_skills {
                output.push_str(&format!(
                    "| {} | {} | {:.0}% |\n",
                    skill.skill,
                    skill.match_frequency,
                    skill.match_rate * 100.0
                ));
            }
            output.push('\n');
        }

        if !report.skill_gaps.is_empty() {
            output.push_str("## Skill Gaps\n\n| Skill | Missing in | Impact | Priority |\n|-------|------------|--------|----------|\n");
            for gap in &report.skill_gaps {
                let impact = match gap.impact {
                    GapImpact::Critical => "critical",
                    GapImpact::High => "high",
                    GapImpact::Medium => "medium",
                };
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    gap.skill, gap.gap_frequency, impact, gap.priority
                ));
            }
            output.push('\n');
        }

        if !report.trending_skills.is_empty() {
            output.push_str("## Trending Skills\n\n");
            for trending in &report.trending_skills {
                output.push_str(&format!(
                    "- {} ({:.0}% of recent jobs)\n",
                    trending.skill,
                    trending.trend_score * 100.0
                ));
            }
            output.push('\n');
        }

        output.push_str("## Recommendations\n\n");
        for recommendation in &report.recommendations {
            output.push_str(&format!("- {}\n", recommendation));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_match(&self, analysis: &JobAnalysis, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_match(analysis)
    }

    pub fn generate_batch(&self, analyses: &[JobAnalysis], format: OutputFormat) -> Result<String> {
        self.formatter(format).format_batch(analyses)
    }

    pub fn generate_profile_report(&self, report: &ProfileReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_profile_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, base_name: &str, timestamp: bool) -> String {
    let stem = Path::new(base_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_match{}.txt", stem, suffix),
        OutputFormat::Json => format!("{}_match{}.json", stem, suffix),
        OutputFormat::Markdown => format!("{}_match{}.md", stem, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::{MatchTrend, ScoreDistribution, SkillGap};
    use crate::processing::requirements::RequirementSet;
    use crate::processing::scoring::{MatchResult, ScoreBreakdown};
    use crate::processing::suggestions::{MatchSuggestion, SuggestionType};

    fn analysis() -> JobAnalysis {
        JobAnalysis {
            job_id: "j1".to_string(),
            job_title: Some("Backend Engineer".to_string()),
            requirements: RequirementSet {
                must_have: vec!["python".to_string(), "go".to_string()],
                nice_to_have: vec![],
                bonus: vec![],
            },
            result: MatchResult {
                score: 62.5,
                reasons: vec![
                    MatchReason {
                        skill: "python".to_string(),
                        category: RequirementTier::MustHave,
                        status: MatchStatus::Matched,
                        weight: 0.45,
                    },
                    MatchReason {
                        skill: "go".to_string(),
                        category: RequirementTier::MustHave,
                        status: MatchStatus::Missing,
                        weight: 0.0,
                    },
                ],
                suggestions: vec![MatchSuggestion {
                    suggestion_type: SuggestionType::CvImprovement,
                    suggestion: "Prioritize gaining experience with go".to_string(),
                    rationale: "Missing must-have".to_string(),
                    priority: Priority::Critical,
                }],
                breakdown: ScoreBreakdown {
                    skill_match: 55.0,
                    text_similarity: 7.5,
                    experience_bonus: 0.0,
                },
            },
        }
    }

    fn report() -> ProfileReport {
        ProfileReport {
            profile_id: "p1".to_string(),
            total_jobs_analyzed: 3,
            average_match_score: 71.0,
            median_match_score: 70.0,
            match_distribution: ScoreDistribution {
                excellent: 0,
                good: 3,
                poor: 0,
            },
            top_skills: vec![],
            skill_gaps: vec![SkillGap {
                skill: "go".to_string(),
                gap_frequency: 3,
                impact: GapImpact::Critical,
                priority: 1,
            }],
            trending_skills: vec![],
            match_trend: MatchTrend {
                direction: TrendDirection::Stable,
                change: 0.5,
                early_average: 70.0,
                recent_average: 70.5,
            },
            recommendations: vec!["🔧 Critical: Immediately focus on go".to_string()],
            last_updated: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_console_without_colors() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_match(&analysis()).unwrap();

        assert!(output.contains("Backend Engineer"));
        assert!(output.contains("62.50/100 [GOOD]"));
        assert!(output.contains("[!]"));
        assert!(output.contains("Must have:    python, go"));
    }

    #[test]
    fn test_json_round_trips() {
        let formatter = JsonFormatter::new(false);
        let json = formatter.format_match(&analysis()).unwrap();
        let parsed: JobAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, analysis());
        assert!(json.contains("\"status\":\"missing\""));
        assert!(json.contains("\"category\":\"must_have\""));
    }

    #[test]
    fn test_markdown_report_tables() {
        let formatter = MarkdownFormatter::new(false);
        let output = formatter.format_profile_report(&report()).unwrap();
        assert!(output.contains("| go | 3 | critical | 1 |"));
        assert!(output.contains("**Trend:** stable"));
    }

    #[test]
    fn test_generator_dispatch_and_save() {
        let generator = ReportGenerator::with_options(false, false, true, true);
        let content = generator
            .generate_batch(&[analysis()], OutputFormat::Markdown)
            .unwrap();
        assert!(content.contains("| 1 | Backend Engineer | 62.50 | go |"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(suggest_filename(OutputFormat::Markdown, "jobs.json", false));
        save_report_to_file(&content, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
        assert!(path.ends_with("jobs_match.md"));
    }
}
