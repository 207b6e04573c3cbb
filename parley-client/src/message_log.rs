//! Append-only sequence of messages shown to the user.

use shared::models::ChatMessage;

/// Ordered message sequence merging the historical snapshot with the live
/// stream and local optimistic sends.
///
/// Display order equals arrival order: the snapshot forms a contiguous
/// prefix in fetch order, followed by stream messages in receipt order.
/// Entries are never mutated, reordered, or deduplicated; a sent message
/// may therefore appear twice when the server echoes the sender's own
/// broadcast back (protocol responsibility, not suppressed here).
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
}

impl MessageLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a historical snapshot as a contiguous prefix.
    ///
    /// Called once per Joined session, right after the fetch resolves. On a
    /// non-empty log the snapshot is still appended rather than reconciled;
    /// messages carry no stable sequence number to merge on.
    pub fn load_snapshot(&mut self, messages: Vec<ChatMessage>) {
        self.messages.extend(messages);
    }

    /// Appends one live-stream or optimistic message.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Empties the log, used on logout.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The ordered read view for rendering.
    #[must_use]
    pub fn all(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when the log holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
