//! Execution Sandbox の実装
//!
//! 信頼できないソースコードを、一意なワークスペース内で外部プロセスとして
//! コンパイル・実行します。ハードなウォールクロック期限と、結果によらない
//! ワークスペースの後始末を保証します。

pub mod language;
pub mod process;
pub mod workspace;

pub use process::ProcessSandbox;
