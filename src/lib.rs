pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod orchestrator;
pub mod security;
pub mod ui;

// Re-export commonly used types for convenience
pub use error::{AppError, AppResult};
pub use orchestrator::{Orchestrator, Outcome, State};
pub use security::{classify, Verdict};
