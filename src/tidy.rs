//! Post-generation `go mod tidy`.
//!
//! Runs the Go toolchain in the output directory so the generated `go.mod`
//! picks up every module the rendered sources import. Artifacts written
//! before this step stay on disk whether it succeeds or not.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::TIDY_TIMEOUT;
use crate::core::{CtrlgenError, Result};

/// Runs `go mod tidy` with a time limit.
#[derive(Debug, Clone)]
pub struct TidyCommand {
    program: String,
    timeout_duration: Duration,
}

impl Default for TidyCommand {
    fn default() -> Self {
        Self {
            program: "go".to_string(),
            timeout_duration: TIDY_TIMEOUT,
        }
    }
}

impl TidyCommand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable in place of `go`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Run `<program> mod tidy` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CtrlgenError::TidyFailed`] if the program is not on `PATH`,
    /// cannot be spawned, times out, or exits unsuccessfully.
    pub async fn run(&self, dir: &Path) -> Result<()> {
        let program = which::which(&self.program).map_err(|e| CtrlgenError::TidyFailed {
            reason: format!("`{}` not found on PATH: {e}", self.program),
        })?;

        tracing::info!(dir = %dir.display(), "running go mod tidy");
        let mut cmd = Command::new(&program);
        cmd.args(["mod", "tidy"])
            .current_dir(dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.timeout_duration, cmd.output()).await {
            Ok(result) => result.map_err(|e| CtrlgenError::TidyFailed {
                reason: format!("failed to spawn {}: {e}", program.display()),
            })?,
            Err(_) => {
                tracing::warn!("go mod tidy timed out after {:?}", self.timeout_duration);
                return Err(CtrlgenError::TidyFailed {
                    reason: format!("timed out after {:?}", self.timeout_duration),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!("go mod tidy stderr: {}", stderr);
            return Err(CtrlgenError::TidyFailed {
                reason: match output.status.code() {
                    Some(code) => format!("exit code {code}: {}", stderr.trim()),
                    None => format!("terminated by signal: {}", stderr.trim()),
                },
            });
        }

        tracing::debug!("go mod tidy completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_program_is_tidy_failure() {
        let temp = TempDir::new().unwrap();
        let err = TidyCommand::new()
            .with_program("ctrlgen-no-such-go-binary")
            .run(temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, CtrlgenError::TidyFailed { ref reason } if reason.contains("not found")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_tidy_failure() {
        let temp = TempDir::new().unwrap();
        let err = TidyCommand::new().with_program("false").run(temp.path()).await.unwrap_err();
        assert!(matches!(err, CtrlgenError::TidyFailed { ref reason } if reason.starts_with("exit code 1")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_run_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("slow-go");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = TidyCommand::new()
            .with_program(script.to_str().unwrap())
            .with_timeout(Duration::from_millis(200))
            .run(temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, CtrlgenError::TidyFailed { ref reason } if reason.starts_with("timed out")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run() {
        let temp = TempDir::new().unwrap();
        TidyCommand::new().with_program("true").run(temp.path()).await.unwrap();
    }
}
