//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Summary of one live room for the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub room_id: String,
    /// Display names of the current participants
    pub participants: Vec<String>,
    pub created_at: String,
}
