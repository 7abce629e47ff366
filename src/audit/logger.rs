use crate::config::Config;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// Append-only history of the commands agit ran or was told not to run
pub struct AuditLogger {
    log_path: PathBuf,
    work_dir: PathBuf,
}

impl AuditLogger {
    /// Create an AuditLogger writing to `<config dir>/history.log`
    pub fn new() -> std::io::Result<Self> {
        let dir = Config::config_dir().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string())
        })?;
        Self::with_path(dir.join("history.log"))
    }

    /// Create an AuditLogger with a custom log path
    pub fn with_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let log_path = path.as_ref().to_path_buf();

        // Ensure directory exists
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            log_path,
            work_dir: std::env::current_dir().unwrap_or_default(),
        })
    }

    /// Record entries against a different working directory
    pub fn with_work_dir<P: AsRef<Path>>(mut self, work_dir: P) -> Self {
        self.work_dir = work_dir.as_ref().to_path_buf();
        self
    }

    /// Log a command execution
    pub fn log_command(
        &self,
        command: &str,
        exit_code: i32,
        destructive: bool,
    ) -> std::io::Result<()> {
        let kind = if destructive { "destructive" } else { "safe" };
        self.append(&format!("[exit:{}] [{}] {}", exit_code, kind, command))
    }

    /// Log a destructive command the user declined to run
    pub fn log_declined(&self, command: &str, reason: &str) -> std::io::Result<()> {
        self.append(&format!("[DECLINED] {} reason=\"{}\"", command, reason))
    }

    fn append(&self, entry: &str) -> std::io::Result<()> {
        // Check and rotate log if needed
        self.rotate_if_needed()?;

        let timestamp = Utc::now().to_rfc3339();
        let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());

        let log_entry = format!(
            "[{}] [{}] [{}] {}\n",
            timestamp,
            user,
            self.work_dir.display(),
            entry
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        file.write_all(log_entry.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Rotate log file if it exceeds MAX_LOG_SIZE
    fn rotate_if_needed(&self) -> std::io::Result<()> {
        if !self.log_path.exists() {
            return Ok(());
        }

        let metadata = fs::metadata(&self.log_path)?;
        if metadata.len() > MAX_LOG_SIZE {
            // Rotate: history.log -> history.log.1
            let backup_path = self.log_path.with_extension("log.1");
            fs::rename(&self.log_path, backup_path)?;
        }

        Ok(())
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
