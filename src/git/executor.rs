use crate::git::args::SplitError;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;

/// Errors that can occur while running a suggested command
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Could not parse command: {0}")]
    Parse(#[from] SplitError),

    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Command '{command}' failed with exit code {exit_code}: {stderr}")]
    Failed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ExecutionError {
    /// Exit code to record for this failure, -1 when the process never ran
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionError::Failed { exit_code, .. } => *exit_code,
            _ => -1,
        }
    }
}

/// Runs an argument vector to completion and returns its captured stdout
pub trait RunCommand: Send + Sync {
    fn run(&self, argv: &[String]) -> Result<String, ExecutionError>;
}

/// Executes commands as child processes inside a working directory
#[derive(Debug)]
pub struct GitExecutor {
    work_dir: PathBuf,
}

impl GitExecutor {
    /// Create a new GitExecutor for the given working directory
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Self {
        Self {
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    /// Create a GitExecutor rooted at the process's current directory
    pub fn current_dir() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Get the working directory
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn process_output(&self, output: Output, argv: &[String]) -> Result<String, ExecutionError> {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExecutionError::Failed {
                command: argv.join(" "),
                exit_code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(stdout)
    }
}

impl RunCommand for GitExecutor {
    fn run(&self, argv: &[String]) -> Result<String, ExecutionError> {
        let (program, args) = argv.split_first().ok_or(ExecutionError::EmptyCommand)?;

        log::debug!("Running {:?} in {}", argv, self.work_dir.display());

        // No shell involved: the argument vector is passed through as-is
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ExecutionError::NotFound(program.clone()),
                _ => ExecutionError::Io(e),
            })?;

        self.process_output(output, argv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn create_test_repo() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().to_path_buf();

        Command::new("git")
            .args(["init"])
            .current_dir(&repo_path)
            .output()
            .unwrap();

        (temp_dir, repo_path)
    }

    #[test]
    fn test_run_status() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        let result = executor.run(&argv(&["git", "status", "--porcelain"]));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "");
    }

    #[test]
    fn test_run_failure_reports_exit_code() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        // Log fails in a repository without commits
        let err = executor.run(&argv(&["git", "log", "--oneline"])).unwrap_err();
        match err {
            ExecutionError::Failed { command, exit_code, .. } => {
                assert_eq!(command, "git log --oneline");
                assert_ne!(exit_code, 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_run_missing_program() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        let err = executor
            .run(&argv(&["definitely-not-a-real-binary-agit"]))
            .unwrap_err();
        assert!(matches!(err, ExecutionError::NotFound(_)));
        assert_eq!(err.exit_code(), -1);
    }

    #[test]
    fn test_empty_command() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        let result = executor.run(&[]);
        assert!(matches!(result, Err(ExecutionError::EmptyCommand)));
    }

    #[test]
    fn test_work_dir() {
        let (_temp, repo_path) = create_test_repo();
        let executor = GitExecutor::new(&repo_path);

        assert_eq!(executor.work_dir(), repo_path.as_path());
    }
}
