//! career-mirror: profile to job-description matching from the command line

use career_mirror::cli::{self, Cli, Commands, ConfigAction, SkillsAction};
use career_mirror::config::{Config, OutputFormat};
use career_mirror::error::{CareerMirrorError, Result};
use career_mirror::input::manager::InputManager;
use career_mirror::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use career_mirror::processing::analyzer::AnalysisEngine;
use career_mirror::processing::document::MatchRecord;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Global flags layered over the configured output settings.
struct OutputOptions {
    format: OutputFormat,
    destination: Option<PathBuf>,
    generator: ReportGenerator,
}

impl OutputOptions {
    fn from_cli(cli: &Cli, config: &Config) -> Result<Self> {
        let format = match &cli.format {
            Some(format) => cli::parse_output_format(format).map_err(CareerMirrorError::InvalidInput)?,
            None => config.output.format,
        };
        let use_colors = config.output.color_output && !cli.no_color && cli.output.is_none();
        let detailed = cli.detailed || config.output.detailed;

        Ok(Self {
            format,
            destination: cli.output.clone(),
            generator: ReportGenerator::with_options(use_colors, detailed, true, true),
        })
    }

    fn emit(&self, content: &str, base_name: &str) -> Result<()> {
        match &self.destination {
            Some(path) => {
                let path = if path.is_dir() {
                    path.join(suggest_filename(self.format, base_name, true))
                } else {
                    path.clone()
                };
                save_report_to_file(content, &path)?;
                println!("💾 Saved to {}", path.display());
            }
            None => println!("{}", content),
        }
        Ok(())
    }
}

fn check_document(path: &Path, what: &str) -> Result<()> {
    cli::validate_file_extension(path, DOCUMENT_EXTENSIONS)
        .map_err(|e| CareerMirrorError::InvalidInput(format!("{} file: {}", what, e)))
}

async fn run_command(cli: Cli, config: Config) -> Result<()> {
    let output = OutputOptions::from_cli(&cli, &config)?;

    match cli.command {
        Commands::Match { profile, job, skills } => {
            check_document(&profile, "Profile")?;
            check_document(&job, "Job description")?;

            let engine = AnalysisEngine::new(&config)?;
            let mut input_manager = InputManager::new();
            let profile_input = input_manager.load_profile(&profile, skills).await?;
            let job_input = input_manager.load_job(&job).await?;

            info!("Matching {} against {}", profile.display(), job.display());
            let analysis = engine.analyze(&profile_input, &job_input);

            let content = output.generator.generate_match(&analysis, output.format)?;
            output.emit(&content, &job_input.id)?;
        }

        Commands::Batch {
            profile,
            jobs,
            skills,
            history,
        } => {
            check_document(&profile, "Profile")?;

            let engine = AnalysisEngine::new(&config)?;
            let mut input_manager = InputManager::new();
            let profile_input = input_manager.load_profile(&profile, skills).await?;
            let job_inputs = input_manager.load_jobs(&jobs).await?;

            let progress = ProgressBar::new(job_inputs.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} jobs ({elapsed})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );

            let analyses = engine
                .analyze_batch_with_progress(&profile_input, &job_inputs, |done| {
                    progress.set_position(done as u64)
                })
                .await;
            progress.finish_and_clear();

            if let Some(history_path) = history {
                let now = chrono::Utc::now();
                let records: Vec<MatchRecord> = analyses
                    .iter()
                    .zip(&job_inputs)
                    .map(|(analysis, job)| MatchRecord {
                        job_id: job.id.clone(),
                        job_text: job.text.clone(),
                        result: analysis.result.clone(),
                        created_at: now,
                    })
                    .collect();
                save_report_to_file(&serde_json::to_string_pretty(&records)?, &history_path)?;
                info!("Wrote {} match records to {}", records.len(), history_path.display());
            }

            let content = output.generator.generate_batch(&analyses, output.format)?;
            output.emit(&content, &profile_input.id)?;
        }

        Commands::Report { history, profile_id } => {
            let engine = AnalysisEngine::new(&config)?;
            let records = InputManager::new().load_history(&history).await?;
            let report = engine.build_report(&profile_id, &records);

            let content = output.generator.generate_profile_report(&report, output.format)?;
            output.emit(&content, &profile_id)?;
        }

        Commands::Skills { action } => {
            let engine = AnalysisEngine::new(&config)?;
            match action {
                SkillsAction::Extract { file } => {
                    check_document(&file, "Input")?;
                    let text = InputManager::new().extract_text(&file).await?;
                    let skills = engine.extractor().extract_best(&text);

                    if output.format == OutputFormat::Json {
                        output.emit(&serde_json::to_string_pretty(&skills)?, "skills")?;
                    } else {
                        println!("🔍 {} skills found in {}\n", skills.len(), file.display());
                        for skill in &skills {
                            let category = engine.taxonomy().category_of(&skill.skill);
                            println!("  • {} ({}, confidence {:.2})", skill.skill, category, skill.confidence);
                        }
                    }
                }
                SkillsAction::Normalize { names } => {
                    for name in &names {
                        let (canonical, confidence) = engine.taxonomy().normalize(name);
                        if engine.taxonomy().contains(&canonical) {
                            println!("{} → {} ({:.2})", name, canonical, confidence);
                        } else {
                            println!("{} → {} (unknown skill)", name, canonical);
                            let hints = engine.taxonomy().similar_skills(name, 3);
                            if !hints.is_empty() {
                                let names: Vec<&str> = hints.iter().map(|(s, _)| s.as_str()).collect();
                                println!("   did you mean: {}?", names.join(", "));
                            }
                        }
                    }
                }
                SkillsAction::Classify { file } => {
                    check_document(&file, "Job description")?;
                    let text = InputManager::new().extract_text(&file).await?;
                    let requirements = engine.classify(&text);

                    if output.format == OutputFormat::Json {
                        output.emit(&serde_json::to_string_pretty(&requirements)?, "requirements")?;
                    } else {
                        println!("📋 Requirements in {}\n", file.display());
                        println!("  Must have:    {}", requirements.must_have.join(", "));
                        println!("  Nice to have: {}", requirements.nice_to_have.join(", "));
                        println!("  Bonus:        {}", requirements.bonus.join(", "));
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    CareerMirrorError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("⚙️  Current Configuration\n");
                println!("{}", content);
            }
            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save()?;
                println!("✅ Configuration reset successfully!");
            }
            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}
