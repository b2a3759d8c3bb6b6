//! Sandbox trait 定義
//!
//! 信頼できないソースコードの実行に対するドメイン層のインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

/// Result of one sandboxed compilation/execution attempt.
///
/// Every error path (unsupported language, compile failure, runtime crash,
/// timeout) terminates in a normal outcome value; the sandbox never raises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Captured output: stdout on success, diagnostics on failure
    pub output: String,
    pub success: bool,
}

impl ExecutionOutcome {
    pub fn succeeded(output: String) -> Self {
        Self {
            output,
            success: true,
        }
    }

    pub fn failed(output: String) -> Self {
        Self {
            output,
            success: false,
        }
    }
}

/// CodeSandbox trait
///
/// Compiles and runs untrusted source text in an isolated, time-bounded
/// workspace and returns a captured result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeSandbox: Send + Sync {
    /// Run `source` under the toolchain selected by `language`.
    async fn run(&self, source: &str, language: &str) -> ExecutionOutcome;
}
