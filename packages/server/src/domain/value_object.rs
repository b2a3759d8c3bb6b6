//! 値オブジェクト
//!
//! 不正な値をドメインに持ち込まないため、生成時にバリデーションを行います。

use uuid::Uuid;

use super::error::ValueObjectError;

/// Room identifier (opaque string, client-supplied or generated elsewhere)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId. Empty strings are rejected.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Connection identifier, unique per live connection.
///
/// Generated by the transport layer at upgrade time; a reconnect produces a
/// fresh SocketId (no identity continuity across reconnects).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SocketId(String);

impl SocketId {
    /// Create a SocketId from an existing string (e.g., a sync-code target).
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptySocketId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Factory for transport-generated socket ids
pub struct SocketIdFactory;

impl SocketIdFactory {
    /// Generate a fresh unique SocketId (UUID v4)
    pub fn generate() -> SocketId {
        SocketId(Uuid::new_v4().to_string())
    }
}

/// Display name of a participant. User-supplied, not unique within a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a new Username. Empty strings are rejected.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
