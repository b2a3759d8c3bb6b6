//! Collaborative code session server library.
//!
//! Rooms group live WebSocket participants; events (code edits, inline
//! comments, chat, language switches, execution requests) fan out to the
//! room with per-sender ordering, and untrusted source text is compiled and
//! run in a time-bounded process sandbox.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
