use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Sentinel sender id for server-generated announcements (join/leave
/// notices). Rendered without a sender label.
pub const SYSTEM_USER_ID: &str = "system";

/// A single message in the room.
///
/// Messages are immutable once created; the log only ever appends them.
/// Field names follow the collaborator wire protocol (camelCase).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Opaque unique id of the sender, or [`SYSTEM_USER_ID`].
    pub user_id: String,

    /// Display name of the sender.
    pub user_name: String,

    /// The message content.
    pub message_body: String,

    /// When the message was sent.
    pub time_stamp: Timestamp,
}

impl ChatMessage {
    /// True when this message is a server-generated announcement.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.user_id == SYSTEM_USER_ID
    }
}
