//! Longitudinal profile reports built from match history

use crate::config::ReportConfig;
use crate::processing::document::MatchRecord;
use crate::processing::extractor::SkillExtractor;
use crate::processing::requirements::RequirementTier;
use crate::processing::scoring::MatchStatus;
use crate::processing::text_processor::round2;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub const NO_MATCHES_RECOMMENDATION: &str =
    "No matches yet. Start by matching your profile against job descriptions.";

const TOP_LIMIT: usize = 10;
const TRENDING_LIMIT: usize = 5;
const TRENDING_SHARE: f64 = 0.3;

/// Aggregate statistics over a profile's match history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub profile_id: String,
    pub total_jobs_analyzed: usize,
    pub average_match_score: f64,
    pub median_match_score: f64,
    pub match_distribution: ScoreDistribution,
    pub top_skills: Vec<SkillStrength>,
    pub skill_gaps: Vec<SkillGap>,
    pub trending_skills: Vec<TrendingSkill>,
    pub match_trend: MatchTrend,
    pub recommendations: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

/// Score buckets: excellent (>= 90), good (60 to 89), poor (< 60).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub excellent: usize,
    pub good: usize,
    pub poor: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillStrength {
    pub skill: String,
    pub match_frequency: usize,
    pub match_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapImpact {
    Critical,
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    pub gap_frequency: usize,
    pub impact: GapImpact,
    pub priority: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingSkill {
    pub skill: String,
    pub trend_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Declining => "declining",
            TrendDirection::Stable => "stable",
            TrendDirection::InsufficientData => "insufficient_data",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTrend {
    pub direction: TrendDirection,
    pub change: f64,
    pub early_average: f64,
    pub recent_average: f64,
}

impl MatchTrend {
    fn insufficient() -> Self {
        Self {
            direction: TrendDirection::InsufficientData,
            change: 0.0,
            early_average: 0.0,
            recent_average: 0.0,
        }
    }
}

/// Frequency counter that remembers first-seen order for tie breaks.
#[derive(Default)]
struct OrderedCounter {
    counts: Vec<(String, usize)>,
    slots: HashMap<String, usize>,
}

impl OrderedCounter {
    fn add(&mut self, key: &str) {
        match self.slots.get(key) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.slots.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), 1));
            }
        }
    }

    fn most_common(mut self, limit: usize) -> Vec<(String, usize)> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(limit);
        self.counts
    }
}

pub struct AggregateReporter {
    extractor: Arc<SkillExtractor>,
    settings: ReportConfig,
}

impl AggregateReporter {
    pub fn new(extractor: Arc<SkillExtractor>, settings: ReportConfig) -> Self {
        Self {
            extractor,
            settings,
        }
    }

    pub fn report(&self, profile_id: &str, history: &[MatchRecord]) -> ProfileReport {
        self.report_at(profile_id, history, Utc::now())
    }

    /// Build a report as of `now`.
    pub fn report_at(
        &self,
        profile_id: &str,
        history: &[MatchRecord],
        now: DateTime<Utc>,
    ) -> ProfileReport {
        if history.is_empty() {
            return ProfileReport {
                profile_id: profile_id.to_string(),
                total_jobs_analyzed: 0,
                average_match_score: 0.0,
                median_match_score: 0.0,
                match_distribution: ScoreDistribution::default(),
                top_skills: Vec::new(),
                skill_gaps: Vec::new(),
                trending_skills: Vec::new(),
                match_trend: MatchTrend::insufficient(),
                recommendations: vec![NO_MATCHES_RECOMMENDATION.to_string()],
                last_updated: now,
            };
        }

        // Newest first, bounded.
        let mut matches: Vec<&MatchRecord> = history.iter().collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches.truncate(self.settings.history_limit.max(1));
        let total = matches.len();

        let scores: Vec<f64> = matches.iter().map(|m| m.result.score).collect();
        let average = scores.iter().sum::<f64>() / total as f64;

        let match_distribution = ScoreDistribution {
            excellent: scores.iter().filter(|s| **s >= 90.0).count(),
            good: scores.iter().filter(|s| (60.0..90.0).contains(*s)).count(),
            poor: scores.iter().filter(|s| **s < 60.0).count(),
        };

        let mut strengths = OrderedCounter::default();
        let mut gaps = OrderedCounter::default();
        for record in &matches {
            for reason in &record.result.reasons {
                match (reason.status, reason.category) {
                    (MatchStatus::Matched, _) => strengths.add(&reason.skill),
                    (MatchStatus::Missing, RequirementTier::MustHave) => gaps.add(&reason.skill),
                    _ => {}
                }
            }
        }

        let top_skills: Vec<SkillStrength> = strengths
            .most_common(TOP_LIMIT)
            .into_iter()
            .map(|(skill, count)| SkillStrength {
                skill,
                match_frequency: count,
                match_rate: round2(count as f64 / total as f64),
            })
            .collect();

        let skill_gaps: Vec<SkillGap> = gaps
            .most_common(TOP_LIMIT)
            .into_iter()
            .map(|(skill, count)| {
                let share = count as f64 / total as f64;
                SkillGap {
                    skill,
                    gap_frequency: count,
                    impact: if share > 0.7 {
                        GapImpact::Critical
                    } else if share > 0.4 {
                        GapImpact::High
                    } else {
                        GapImpact::Medium
                    },
                    priority: if share > 0.5 {
                        1
                    } else if share > 0.3 {
                        2
                    } else {
                        3
                    },
                }
            })
            .collect();

        let trending_skills = self.trending_skills(&matches, now);
        let match_trend = self.match_trend(&matches);
        let recommendations =
            recommendations(average, &skill_gaps, &trending_skills, &top_skills);

        debug!(
            "Report for {}: {} matches, trend {}",
            profile_id, total, match_trend.direction
        );

        ProfileReport {
            profile_id: profile_id.to_string(),
            total_jobs_analyzed: total,
            average_match_score: round2(average),
            median_match_score: round2(median(&scores)),
            match_distribution,
            top_skills,
            skill_gaps,
            trending_skills,
            match_trend,
            recommendations,
            last_updated: now,
        }
    }

    fn trending_skills(&self, matches: &[&MatchRecord], now: DateTime<Utc>) -> Vec<TrendingSkill> {
        let window = Duration::days(self.settings.trending_window_days);
        let recent: Vec<&&MatchRecord> = matches
            .iter()
            .filter(|m| now.signed_duration_since(m.created_at) <= window)
            .collect();

        if recent.is_empty() {
            return Vec::new();
        }

        let mut mentions = OrderedCounter::default();
        for record in &recent {
            for skill in self.extractor.extract_unique(&record.job_text) {
                mentions.add(&skill);
            }
        }

        let threshold = recent.len() as f64 * TRENDING_SHARE;
        mentions
            .most_common(TRENDING_LIMIT)
            .into_iter()
            .filter(|(_, count)| *count as f64 >= threshold)
            .map(|(skill, count)| TrendingSkill {
                skill,
                trend_score: round2(count as f64 / recent.len() as f64),
            })
            .collect()
    }

    fn match_trend(&self, matches: &[&MatchRecord]) -> MatchTrend {
        let mut ordered: Vec<&&MatchRecord> = matches.iter().collect();
        ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let start = ordered.len().saturating_sub(self.settings.trend_window);
        let window: Vec<f64> = ordered[start..].iter().map(|m| m.result.score).collect();

        if window.len() < 3 {
            return MatchTrend::insufficient();
        }

        let half = window.len() / 2;
        let early = window[..half].iter().sum::<f64>() / half as f64;
        let recent = window[half..].iter().sum::<f64>() / (window.len() - half) as f64;
        let change = recent - early;

        let direction = if change.abs() < 2.0 {
            TrendDirection::Stable
        } else if change > 0.0 {
            TrendDirection::Improving
        } else {
            TrendDirection::Declining
        };

        MatchTrend {
            direction,
            change: round2(change),
            early_average: round2(early),
            recent_average: round2(recent),
        }
    }
}

fn median(scores: &[f64]) -> f64 {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.is_empty() {
        0.0
    } else if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn recommendations(
    average: f64,
    gaps: &[SkillGap],
    trending: &[TrendingSkill],
    strengths: &[SkillStrength],
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    let bracket: [&str; 2] = if average < 50.0 {
        [
            "🚨 Focus on fundamental skill development: consider a career pivot or intensive upskilling",
            "📚 Prioritize learning the most in-demand skills in your target roles",
        ]
    } else if average < 70.0 {
        [
            "📈 Good foundation: focus on closing critical skill gaps",
            "🎯 Target roles that better align with your current skill set",
        ]
    } else if average < 85.0 {
        [
            "⭐ Strong profile: fine-tune missing skills and showcase achievements",
            "🏆 Consider senior or specialized roles that match your expertise",
        ]
    } else {
        [
            "🚀 Excellent profile! Focus on leadership skills and cutting-edge technologies",
            "💡 Consider thought leadership through blogging, speaking, or open source contributions",
        ]
    };
    out.extend(bracket.iter().map(|s| s.to_string()));

    let critical: Vec<&str> = gaps
        .iter()
        .take(3)
        .filter(|g| g.impact == GapImpact::Critical)
        .map(|g| g.skill.as_str())
        .collect();
    if !critical.is_empty() {
        out.push(format!("🔧 Critical: Immediately focus on {}", critical.join(", ")));
    }

    if !trending.is_empty() {
        let names: Vec<&str> = trending.iter().take(3).map(|t| t.skill.as_str()).collect();
        out.push(format!(
            "📊 Emerging opportunities: Consider learning {}",
            names.join(", ")
        ));
    }

    if !strengths.is_empty() {
        let names: Vec<&str> = strengths.iter().take(3).map(|s| s.skill.as_str()).collect();
        out.push(format!(
            "💪 Leverage your strengths in {} when applying",
            names.join(", ")
        ));
    }

    out
}
