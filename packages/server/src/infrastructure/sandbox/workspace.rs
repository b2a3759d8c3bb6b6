//! Per-run sandbox workspace.
//!
//! Each execution attempt owns a uniquely named directory under the shared
//! temp root. The name is derived from a millisecond timestamp plus a
//! process-wide monotonic counter, so concurrent runs can never collide.
//! Removing the whole directory on cleanup catches the source file and every
//! derived artifact (compiled binary, `.class` files).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use kyodo_shared::time::get_timestamp_millis;

static RUN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The isolated temporary filesystem location backing one execution attempt.
///
/// Owned exclusively by one in-flight run; `cleanup` must be called on every
/// branch (success, failure, timeout).
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    source_path: PathBuf,
}

impl Workspace {
    /// Allocate a fresh workspace under `root` and write the source text
    /// into it under `file_name`.
    pub async fn create(root: &Path, file_name: &str, source: &str) -> std::io::Result<Self> {
        let seq = RUN_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = root.join(format!("run-{}-{}", get_timestamp_millis(), seq));
        tokio::fs::create_dir_all(&dir).await?;

        let source_path = dir.join(file_name);
        tokio::fs::write(&source_path, source).await?;

        Ok(Self { dir, source_path })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Remove the workspace directory and everything in it.
    ///
    /// Cleanup failures are logged, never propagated: they must not prevent
    /// the execution result from being returned.
    pub async fn cleanup(self) {
        if let Err(e) = tokio::fs::remove_dir_all(&self.dir).await {
            tracing::warn!(
                "Failed to clean up workspace '{}': {}",
                self.dir.display(),
                e
            );
        }
    }
}
