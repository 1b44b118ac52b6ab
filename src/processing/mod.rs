//! Matching pipeline: taxonomy, extraction, classification, scoring

pub mod analyzer;
pub mod document;
pub mod experience;
pub mod extractor;
pub mod importance;
pub mod requirements;
pub mod scoring;
pub mod similarity;
pub mod suggestions;
pub mod taxonomy;
pub mod text_processor;
