//! Child-process CodeSandbox implementation.
//!
//! Runs the language's build/run command as a supervised external process:
//! spawn with the working directory scoped to the workspace, race output
//! collection against a hard wall-clock deadline, SIGKILL the whole process
//! group on expiry, and always clean the workspace up afterwards.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

use crate::domain::{CodeSandbox, ExecutionOutcome};

use super::language::{self, LanguageSpec};
use super::workspace::Workspace;

/// Hard wall-clock deadline for one run (compile + execute)
pub const EXECUTION_TIMEOUT: Duration = Duration::from_secs(10);

/// CodeSandbox implementation backed by local toolchains
pub struct ProcessSandbox {
    /// Shared root under which per-run workspaces are allocated
    temp_root: PathBuf,
    timeout: Duration,
}

impl ProcessSandbox {
    pub fn new(temp_root: PathBuf) -> Self {
        Self::with_timeout(temp_root, EXECUTION_TIMEOUT)
    }

    /// Create a sandbox with a custom deadline (for testing)
    pub fn with_timeout(temp_root: PathBuf, timeout: Duration) -> Self {
        Self { temp_root, timeout }
    }

    async fn run_in_workspace(
        &self,
        spec: &LanguageSpec,
        workspace: &Workspace,
    ) -> ExecutionOutcome {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(spec.command)
            .current_dir(workspace.dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Lead a fresh process group so the deadline can reap the whole
        // tree: the shell, the compiler and any binary the compiler spawned
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ExecutionOutcome::failed(format!("Failed to start toolchain: {}", e));
            }
        };

        // Take pipe handles out so `child` stays available for kill-on-timeout
        let Some(mut child_stdout) = child.stdout.take() else {
            return ExecutionOutcome::failed("Failed to open toolchain stdout".to_string());
        };
        let Some(mut child_stderr) = child.stderr.take() else {
            return ExecutionOutcome::failed("Failed to open toolchain stderr".to_string());
        };

        let read_all = async {
            let mut stdout_buf = Vec::new();
            let mut stderr_buf = Vec::new();
            let (r1, r2) = tokio::join!(
                child_stdout.read_to_end(&mut stdout_buf),
                child_stderr.read_to_end(&mut stderr_buf),
            );
            r1?;
            r2?;
            Ok::<_, std::io::Error>((stdout_buf, stderr_buf))
        };

        let (stdout_buf, stderr_buf) = match tokio::time::timeout(self.timeout, read_all).await {
            Ok(Ok(bufs)) => bufs,
            Ok(Err(e)) => {
                Self::kill_process_tree(&mut child).await;
                return ExecutionOutcome::failed(format!(
                    "Failed to read toolchain output: {}",
                    e
                ));
            }
            Err(_) => {
                Self::kill_process_tree(&mut child).await;
                return ExecutionOutcome::failed(format!(
                    "Execution timed out after {}s",
                    self.timeout.as_secs_f64()
                ));
            }
        };

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => {
                return ExecutionOutcome::failed(format!("Failed to wait for toolchain: {}", e));
            }
        };

        let stdout = String::from_utf8_lossy(&stdout_buf).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_buf).into_owned();

        // A non-empty diagnostic stream is a failure even on exit code 0
        if !stderr.trim().is_empty() {
            return ExecutionOutcome::failed(stderr);
        }
        if !status.success() {
            let output = if stdout.trim().is_empty() {
                format!("Process exited with {}", status)
            } else {
                stdout
            };
            return ExecutionOutcome::failed(output);
        }

        ExecutionOutcome::succeeded(stdout)
    }

    async fn kill_process_tree(child: &mut Child) {
        // The child leads its own process group; kill the group so nothing
        // it spawned survives
        #[cfg(unix)]
        if let Some(pid) = child.id() {
            unsafe {
                libc::killpg(pid as libc::pid_t, libc::SIGKILL);
            }
        }
        if let Err(e) = child.kill().await {
            tracing::warn!("Failed to kill sandboxed process: {}", e);
        }
        let _ = child.wait().await;
    }
}

#[async_trait]
impl CodeSandbox for ProcessSandbox {
    async fn run(&self, source: &str, language: &str) -> ExecutionOutcome {
        let Some(spec) = language::lookup(language) else {
            tracing::warn!("Rejected execution request for unsupported language '{}'", language);
            return ExecutionOutcome::failed(format!("Unsupported language: {}", language));
        };

        let workspace = match Workspace::create(&self.temp_root, spec.file_name, source).await {
            Ok(workspace) => workspace,
            Err(e) => {
                tracing::error!("Failed to allocate sandbox workspace: {}", e);
                return ExecutionOutcome::failed(format!("Failed to prepare workspace: {}", e));
            }
        };

        tracing::debug!(
            "Running {} code in workspace '{}'",
            spec.tag,
            workspace.dir().display()
        );

        let outcome = self.run_in_workspace(spec, &workspace).await;

        // Cleanup runs on every branch: success, compile error, runtime
        // error, timeout
        workspace.cleanup().await;

        outcome
    }
}
