//! Boundary records exchanged with the surrounding application

use crate::processing::scoring::MatchResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate profile, already validated by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub declared_skills: Vec<String>,
}

/// A job posting, already validated by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInput {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// A previously computed match as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub job_id: String,
    pub job_text: String,
    pub result: MatchResult,
    pub created_at: DateTime<Utc>,
}

impl ProfileInput {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            declared_skills: Vec::new(),
        }
    }

    pub fn with_declared_skills(mut self, skills: Vec<String>) -> Self {
        self.declared_skills = skills;
        self
    }
}

impl JobInput {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let title = detect_title(&text);
        Self {
            id: id.into(),
            text,
            title,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }
}

/// First plausible heading within the opening lines.
fn detect_title(text: &str) -> Option<String> {
    text.lines()
        .take(5)
        .map(str::trim)
        .find(|line| {
            line.len() > 5
                && line.len() < 100
                && !line.contains('@')
                && !line.starts_with('-')
                && !line.ends_with(':')
        })
        .map(|line| line.trim_start_matches('#').trim().to_string())
}
