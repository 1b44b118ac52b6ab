//! Configuration management for the career mirror matcher

use crate::error::{CareerMirrorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub processing: ProcessingConfig,
    pub report: ReportConfig,
    pub output: OutputConfig,
}

/// Tier budgets and signal weights feeding the final score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub must_have_weight: f64,
    pub nice_to_have_weight: f64,
    pub bonus_weight: f64,
    pub similarity_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub enable_caching: bool,
    pub similarity_cache_size: u64,
    pub batch_size: usize,
    pub context_window: usize,
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub history_limit: usize,
    pub trending_window_days: i64,
    pub trend_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            must_have_weight: 0.70,
            nice_to_have_weight: 0.25,
            bonus_weight: 0.05,
            similarity_weight: 0.15,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            enable_caching: true,
            similarity_cache_size: 100,
            batch_size: 10,
            context_window: 20,
            max_suggestions: 8,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            trending_window_days: 30,
            trend_window: 10,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            processing: ProcessingConfig::default(),
            report: ReportConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load and validate a configuration file at an explicit location.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CareerMirrorError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CareerMirrorError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("career-mirror")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        let budgets = [
            scoring.must_have_weight,
            scoring.nice_to_have_weight,
            scoring.bonus_weight,
        ];

        if budgets.iter().any(|w| *w < 0.0) || scoring.similarity_weight < 0.0 {
            return Err(CareerMirrorError::Configuration(
                "Scoring weights must be non-negative".to_string(),
            ));
        }

        let total: f64 = budgets.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(CareerMirrorError::Configuration(format!(
                "Tier budgets must sum to 1.0 (got {:.3})",
                total
            )));
        }

        if self.processing.batch_size == 0 {
            return Err(CareerMirrorError::Configuration(
                "processing.batch_size must be at least 1".to_string(),
            ));
        }

        if self.report.history_limit == 0 {
            return Err(CareerMirrorError::Configuration(
                "report.history_limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
