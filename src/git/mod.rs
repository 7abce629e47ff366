pub mod args;
pub mod executor;

// Re-export commonly used types
pub use args::{split_command, split_lenient, SplitError};
pub use executor::{ExecutionError, GitExecutor, RunCommand};
