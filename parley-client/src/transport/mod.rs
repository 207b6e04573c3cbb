//! Bidirectional message/presence stream collaborator.

pub mod sse;

use async_trait::async_trait;
use shared::models::{ClientEvent, ServerEvent};
use tokio::sync::mpsc;

use crate::error::TransportError;

pub use sse::SseTransport;

/// The bidirectional, event-based stream the session talks to.
///
/// Inbound events are delivered over a channel so the session applies them
/// one at a time, in arrival order, with no transition interleaving.
/// Dropping the receiver is the unsubscribe; the transport stops delivering
/// once it notices, and the session drops late stragglers itself.
/// Connection lifecycle (connect/reconnect/backoff) is entirely the
/// transport's concern.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Publishes one outbound event, fire-and-forget: at most one attempt,
    /// no retry, no backpressure.
    ///
    /// # Errors
    /// Returns a [`TransportError`] when the single attempt fails.
    async fn publish(&self, event: ClientEvent) -> Result<(), TransportError>;

    /// Opens a subscription to inbound events.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<ServerEvent>;
}
