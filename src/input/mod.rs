//! Input loading: file detection, text extraction, history files

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::InputManager;
