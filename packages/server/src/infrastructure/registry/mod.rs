//! Room Registry の実装
//!
//! ## 実装
//!
//! - `inmemory`: HashMap をインメモリ DB として使用する実装
//! - 永続化は非対応（プロセス再起動でセッション状態は消える、設計どおり）

pub mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
