//! Loads profiles, jobs and match history from local files

use crate::error::{CareerMirrorError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::document::{JobInput, MatchRecord, ProfileInput};
use anyhow::Context;
use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read a txt, md or pdf file as plain text.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(CareerMirrorError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Json | FileType::Unknown => {
                return Err(CareerMirrorError::UnsupportedFormat(format!(
                    "Expected a .txt, .md or .pdf document: {}",
                    path.display()
                )));
            }
        };

        if text.trim().is_empty() {
            warn!("No text extracted from {}", path.display());
        }

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    pub async fn load_profile(&mut self, path: &Path, declared_skills: Vec<String>) -> Result<ProfileInput> {
        let text = self.extract_text(path).await?;
        Ok(ProfileInput::new(file_id(path), text).with_declared_skills(declared_skills))
    }

    pub async fn load_job(&mut self, path: &Path) -> Result<JobInput> {
        let text = self.extract_text(path).await?;
        Ok(JobInput::new(file_id(path), text))
    }

    /// Jobs from documents, directories of documents, or JSON arrays of jobs.
    pub async fn load_jobs(&mut self, paths: &[PathBuf]) -> Result<Vec<JobInput>> {
        let mut jobs = Vec::new();

        for path in paths {
            if path.is_dir() {
                for entry in document_files(path)? {
                    jobs.push(self.load_job(&entry).await?);
                }
            } else if FileType::from_path(path) == FileType::Json {
                let content = tokio::fs::read_to_string(path).await?;
                let mut parsed: Vec<JobInput> = serde_json::from_str(&content)?;
                for job in &mut parsed {
                    if job.title.is_none() {
                        job.title = JobInput::new(&job.id, job.text.clone()).title;
                    }
                }
                jobs.extend(parsed);
            } else {
                jobs.push(self.load_job(path).await?);
            }
        }

        if jobs.is_empty() {
            return Err(CareerMirrorError::InvalidInput(
                "No job descriptions found in the given paths".to_string(),
            ));
        }

        Ok(jobs)
    }

    /// A JSON array of stored match records.
    pub async fn load_history(&self, path: &Path) -> Result<Vec<MatchRecord>> {
        let content = tokio::fs::read_to_string(path).await?;
        let history: Vec<MatchRecord> = serde_json::from_str(&content)?;
        info!("Loaded {} match records from {}", history.len(), path.display());
        Ok(history)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

fn file_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn document_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list job directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && FileType::from_path(path).is_document())
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_jobs_from_directory_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "Required: Go").unwrap();
        std::fs::write(dir.path().join("a.md"), "Required: Rust").unwrap();
        std::fs::write(dir.path().join("notes.csv"), "ignored").unwrap();

        let mut manager = InputManager::new();
        let jobs = manager.load_jobs(&[dir.path().to_path_buf()]).await.unwrap();

        let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_unsupported_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("cv.csv");
        std::fs::write(&csv, "x").unwrap();

        let mut manager = InputManager::new();
        assert!(matches!(
            manager.extract_text(&csv).await,
            Err(CareerMirrorError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            manager.extract_text(&dir.path().join("missing.txt")).await,
            Err(CareerMirrorError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_text_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "Rust").unwrap();

        let mut manager = InputManager::new();
        manager.extract_text(&path).await.unwrap();
        std::fs::write(&path, "changed").unwrap();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "Rust");
        assert_eq!(manager.cache_size(), 1);

        manager.clear_cache();
        assert_eq!(manager.cache_size(), 0);
        assert_eq!(manager.extract_text(&path).await.unwrap(), "changed");
    }

    #[tokio::test]
    async fn test_cache_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.md");
        std::fs::write(&path, "Required: Go").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        manager.extract_text(&path).await.unwrap();
        std::fs::write(&path, "Required: Rust").unwrap();

        assert_eq!(manager.extract_text(&path).await.unwrap(), "Required: Rust");
        assert_eq!(manager.cache_size(), 0);
    }
}
