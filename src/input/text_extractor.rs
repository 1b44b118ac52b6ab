//! Text extraction from profile and job files

use crate::error::{CareerMirrorError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            CareerMirrorError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown))
    }
}

/// Flatten Markdown to plain text.
///
/// Blocks stay separated by blank lines and list items keep a leading "- ".
/// A label ending in ':' stays attached to the block after it.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut out = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Item) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("- ");
            }
            Event::End(Tag::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::End(Tag::Paragraph) | Event::End(Tag::Heading(..)) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                // Loose list items wrap their text in paragraphs; a trailing
                // colon marks a section label that owns the following block.
                if !out.ends_with("\n\n")
                    && !last_line_is_item(&out)
                    && !out.trim_end().ends_with(':')
                {
                    out.push('\n');
                }
            }
            Event::End(Tag::List(_)) => {
                if !out.ends_with("\n\n") {
                    out.push('\n');
                }
            }
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            _ => {}
        }
    }

    out.trim().to_string()
}

fn last_line_is_item(out: &str) -> bool {
    out.trim_end_matches('\n')
        .rsplit('\n')
        .next()
        .map_or(false, |line| line.starts_with("- "))
}
