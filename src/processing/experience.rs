//! Years-of-experience comparison between a profile and a job

use crate::error::Result;
use regex::Regex;

pub const EXCEEDS_BONUS: f64 = 0.05;
pub const MEETS_BONUS: f64 = 0.02;
pub const SHORTFALL_PENALTY: f64 = -0.05;

pub struct ExperienceAnalyzer {
    profile_patterns: Vec<Regex>,
    job_patterns: Vec<Regex>,
}

impl ExperienceAnalyzer {
    pub fn new() -> Result<Self> {
        let profile_patterns = [
            r"(\d+)\+?\s*years?(?:\s+of)?(?:\s+\w+){0,2}\s+experience",
            r"over\s+(\d+)\s+years?",
            r"more than\s+(\d+)\s+years?",
        ];
        let job_patterns = [
            r"(\d+)\+?\s*years?(?:\s+of)?(?:\s+\w+){0,2}\s+(?:experience|background)",
            r"minimum\s+(\d+)\s+years?",
            r"at least\s+(\d+)\s+years?",
        ];

        Ok(Self {
            profile_patterns: profile_patterns
                .iter()
                .map(|p| Regex::new(p))
                .collect::<std::result::Result<_, _>>()?,
            job_patterns: job_patterns
                .iter()
                .map(|p| Regex::new(p))
                .collect::<std::result::Result<_, _>>()?,
        })
    }

    /// Largest year figure claimed in the profile.
    pub fn profile_years(&self, profile_text: &str) -> Option<u32> {
        year_mentions(&self.profile_patterns, profile_text).max()
    }

    /// Smallest year figure the job asks for.
    pub fn required_years(&self, job_text: &str) -> Option<u32> {
        year_mentions(&self.job_patterns, job_text).min()
    }

    /// One of +0.05, +0.02, -0.05, or 0.0 when either side states no figure.
    pub fn adjustment(&self, profile_text: &str, job_text: &str) -> f64 {
        let (Some(have), Some(need)) = (
            self.profile_years(profile_text),
            self.required_years(job_text),
        ) else {
            return 0.0;
        };

        let have = f64::from(have);
        let need = f64::from(need);
        if have >= need * 1.5 {
            EXCEEDS_BONUS
        } else if have >= need {
            MEETS_BONUS
        } else {
            SHORTFALL_PENALTY
        }
    }
}

fn year_mentions(patterns: &[Regex], text: &str) -> std::vec::IntoIter<u32> {
    let lowered = text.to_lowercase();
    let mut years = Vec::new();
    for pattern in patterns {
        years.extend(
            pattern
                .captures_iter(&lowered)
                .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok()),
        );
    }
    years.into_iter()
}
