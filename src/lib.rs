//! career-mirror library: skill extraction, requirement tiers, match scoring and profile reports

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{CareerMirrorError, Result};
