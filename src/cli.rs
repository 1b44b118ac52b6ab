//! CLI interface for career-mirror

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "career-mirror")]
#[command(about = "Score candidate profiles against job descriptions")]
#[command(long_about = "Match a profile against job descriptions using tiered skill coverage, text similarity and experience signals, and summarize match history")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: console, json, markdown (overrides config)
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Save output to file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Show extra detail in console output
    #[arg(short, long, global = true)]
    pub detailed: bool,

    /// Disable colored console output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match a profile against one job description
    Match {
        /// Path to profile file (PDF, TXT, MD)
        #[arg(short, long)]
        profile: PathBuf,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Declared profile skills, comma separated
        #[arg(short, long, value_delimiter = ',')]
        skills: Vec<String>,
    },

    /// Match a profile against many job descriptions
    Batch {
        /// Path to profile file (PDF, TXT, MD)
        #[arg(short, long)]
        profile: PathBuf,

        /// Job files, directories of job files, or JSON arrays of jobs
        #[arg(short, long, required = true, num_args = 1..)]
        jobs: Vec<PathBuf>,

        /// Declared profile skills, comma separated
        #[arg(short, long, value_delimiter = ',')]
        skills: Vec<String>,

        /// Write the batch as a JSON match-history file
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Summarize a JSON match-history file
    Report {
        /// Path to match history (JSON array of match records)
        #[arg(long)]
        history: PathBuf,

        /// Profile identifier shown in the report
        #[arg(long, default_value = "profile")]
        profile_id: String,
    },

    /// Skill taxonomy tools
    Skills {
        #[command(subcommand)]
        action: SkillsAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum SkillsAction {
    /// Extract skills from a document
    Extract {
        /// Path to document (PDF, TXT, MD)
        file: PathBuf,
    },

    /// Normalize skill names to their canonical form
    Normalize {
        /// Skill names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Split a job description into requirement tiers
    Classify {
        /// Path to job description (PDF, TXT, MD)
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert_eq!(parse_output_format("json").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf", "txt"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }

    #[test]
    fn test_batch_accepts_comma_separated_skills() {
        let cli = Cli::parse_from([
            "career-mirror",
            "batch",
            "--profile",
            "cv.txt",
            "--jobs",
            "a.txt",
            "b.md",
            "--skills",
            "rust,go",
        ]);
        match cli.command {
            Commands::Batch { jobs, skills, .. } => {
                assert_eq!(jobs.len(), 2);
                assert_eq!(skills, vec!["rust", "go"]);
            }
            _ => panic!("expected batch command"),
        }
    }
}
