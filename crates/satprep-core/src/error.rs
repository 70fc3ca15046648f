//! Error types for satprep

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using SatPrepError
pub type Result<T> = std::result::Result<T, SatPrepError>;

/// Error type alias for convenience
pub type Error = SatPrepError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NO_INPUT: i32 = 2;
    pub const INVALID_CONFIG: i32 = 3;
    pub const PROVIDER_ERROR: i32 = 4;
}

/// Main error type for satprep
#[derive(Debug, Error)]
pub enum SatPrepError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No PDFs found under {}", .0.display())]
    NoInput(PathBuf),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walk directory error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("External service error: {0}")]
    Provider(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl SatPrepError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoInput(_) => exit_codes::NO_INPUT,
            Self::Config(_) | Self::InvalidInput(_) => exit_codes::INVALID_CONFIG,
            Self::Http(_) | Self::Provider(_) | Self::Llm(_) | Self::Index(_) => {
                exit_codes::PROVIDER_ERROR
            }
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// Whether this error came from a remote embedding, index or model call
    pub fn is_provider_error(&self) -> bool {
        self.exit_code() == exit_codes::PROVIDER_ERROR
    }
}
