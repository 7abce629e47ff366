use std::io;
use thiserror::Error;

// Import module-level errors for AppError
use crate::config::ConfigError;
use crate::git::ExecutionError;
use crate::llm::{LLMError, ReviewError, TranslationError};

/// Top-level application error that wraps all module-specific errors
///
/// A declined confirmation is not an error; it ends the run as
/// `Outcome::Aborted`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
