use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardrailsError {
    #[error(
        "invalid characters in input: '{0}' (only letters, digits, spaces, hyphens, \
         underscores, dots, and @ are allowed)"
    )]
    InvalidInput(String),

    #[error("days back must be a non-negative integer, got: {0}")]
    InvalidRange(String),

    #[error("summary is required")]
    MissingSummary,

    #[error("refusing to overwrite {} (use --force, optionally --backup)", .0.display())]
    TaskExists(PathBuf),

    #[error("missing bundle source: {}", .0.display())]
    MissingSource(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, GuardrailsError>;
