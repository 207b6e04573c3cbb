//! Session orchestration: the state machine reconciling history, stream,
//! and presence into one consistent view.

use std::{fmt, sync::Arc};

use shared::models::{ChatMessage, ClientEvent, Participant, ServerEvent, Timestamp};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::SessionError,
    history::HistoryService,
    identity::{Identity, IdentityStore},
    message_log::MessageLog,
    presence::PresenceTracker,
    transport::ChatTransport,
};

/// Lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No identity, no subscription, empty views.
    Anonymous,
    /// Identity present, subscription active, views populated.
    Joined,
}

/// The user-facing chat session.
///
/// Owns the message log, presence tracker, and identity store exclusively;
/// every transition is a discrete call that runs to completion, so no
/// locking is needed. Stream events arriving while the historical fetch is
/// outstanding queue in the subscription channel and are applied afterwards
/// in arrival order, preserving the snapshot-then-stream ordering.
pub struct SyncSession {
    identity_store: Box<dyn IdentityStore>,
    transport: Arc<dyn ChatTransport>,
    history: Arc<dyn HistoryService>,
    identity: Option<Identity>,
    presence: PresenceTracker,
    log: MessageLog,
    events: Option<mpsc::UnboundedReceiver<ServerEvent>>,
    // Bumped on every join and logout; a historical fetch resolving under a
    // stale epoch belongs to a session that no longer exists.
    epoch: u64,
}

impl SyncSession {
    /// Creates an Anonymous session over the given collaborators.
    #[must_use]
    pub fn new(
        identity_store: Box<dyn IdentityStore>,
        transport: Arc<dyn ChatTransport>,
        history: Arc<dyn HistoryService>,
    ) -> Self {
        Self {
            identity_store,
            transport,
            history,
            identity: None,
            presence: PresenceTracker::new(),
            log: MessageLog::new(),
            events: None,
            epoch: 0,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.identity.is_some() {
            SessionState::Joined
        } else {
            SessionState::Anonymous
        }
    }

    /// The local identity, present only while Joined.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Ordered read view of the message log.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        self.log.all()
    }

    /// Everyone currently online, in stable order.
    #[must_use]
    pub fn online(&self) -> &[Participant] {
        self.presence.list_online()
    }

    /// Cold start: re-derives the session from persisted state.
    ///
    /// With a stored identity the session goes straight to Joined —
    /// announcing presence, subscribing, and loading history. A corrupt or
    /// unreadable store is logged and treated as absent; the session stays
    /// usable either way.
    pub async fn start(&mut self) {
        let identity = match self.identity_store.load() {
            Ok(identity) => identity,
            Err(err) => {
                warn!("failed to load persisted identity: {err}");
                None
            }
        };
        if let Some(identity) = identity {
            self.enter_joined(identity).await;
        }
    }

    /// Joins the room under a fresh identity.
    ///
    /// # Errors
    /// Returns [`SessionError::Validation`] when the name is empty after
    /// trimming, and [`SessionError::Identity`] when the identity cannot be
    /// persisted. Neither changes session state.
    pub async fn join(&mut self, user_name: &str) -> Result<(), SessionError> {
        if self.identity.is_some() {
            debug!("join ignored: already joined");
            return Ok(());
        }
        let trimmed = user_name.trim();
        if trimmed.is_empty() {
            return Err(SessionError::Validation("display name must not be empty"));
        }

        let identity = Identity {
            user_id: Uuid::new_v4().to_string(),
            user_name: trimmed.to_string(),
        };
        self.identity_store.save(&identity)?;
        self.enter_joined(identity).await;
        Ok(())
    }

    /// Sends a message to the room.
    ///
    /// Empty-after-trim text is silently ignored, as is a call while
    /// Anonymous. The message is appended optimistically before the
    /// outward publish; delivery is fire-and-forget and a failed publish
    /// or persist is logged and swallowed, the local copy stays visible.
    pub async fn send_message(&mut self, text: &str) {
        let Some(identity) = &self.identity else {
            debug!("send ignored while anonymous");
            return;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }

        let message = ChatMessage {
            user_id: identity.user_id.clone(),
            user_name: identity.user_name.clone(),
            message_body: trimmed.to_string(),
            time_stamp: Timestamp::now(),
        };
        self.log.append(message.clone());

        if let Err(err) = self
            .transport
            .publish(ClientEvent::Message {
                payload: message.clone(),
            })
            .await
        {
            warn!("failed to publish message: {err}");
        }
        if let Err(err) = self.history.persist_message(&message).await {
            warn!("failed to persist message: {err}");
        }
    }

    /// Waits for the next inbound stream event, applies it, and returns it
    /// for rendering. Pends forever while Anonymous or after the stream
    /// closes, so it is safe to poll from a `select!` loop in any state.
    pub async fn next_event(&mut self) -> ServerEvent {
        loop {
            match &mut self.events {
                Some(receiver) => match receiver.recv().await {
                    Some(event) => {
                        self.apply_event(event.clone());
                        return event;
                    }
                    None => {
                        debug!("event stream closed");
                        self.events = None;
                    }
                },
                None => std::future::pending::<()>().await,
            }
        }
    }

    /// Applies one inbound stream event.
    ///
    /// Events received while Anonymous are dropped silently; a stale
    /// subscription is not trusted to stop delivering immediately.
    pub fn apply_event(&mut self, event: ServerEvent) {
        if self.identity.is_none() {
            debug!("dropping stream event received while anonymous");
            return;
        }
        match event {
            ServerEvent::Message { payload } => self.log.append(payload),
            ServerEvent::UserJoined { payload } => self.presence.add_or_update(payload),
            ServerEvent::UserLeft { payload } => self.presence.remove(&payload.user_id),
            ServerEvent::OnlineUsers { payload } => self.presence.replace_all(payload),
        }
    }

    /// Leaves the room and returns to Anonymous.
    ///
    /// Announces the departure outward (fire-and-forget), clears the
    /// persisted identity and both views, and drops the subscription. A
    /// no-op while Anonymous.
    ///
    /// # Errors
    /// Returns [`SessionError::Identity`] when the persisted identity
    /// cannot be cleared; local views are reset regardless.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        let Some(identity) = self.identity.take() else {
            return Ok(());
        };
        self.epoch += 1;

        if let Err(err) = self
            .transport
            .publish(ClientEvent::Left {
                payload: identity.as_participant(),
            })
            .await
        {
            warn!("failed to announce departure: {err}");
        }

        self.log.clear();
        self.presence.clear();
        self.events = None;
        self.identity_store.clear()?;
        Ok(())
    }

    async fn enter_joined(&mut self, identity: Identity) {
        self.epoch += 1;
        let epoch = self.epoch;

        // Subscribe before fetching so stream events arriving while the
        // fetch is outstanding queue up behind it instead of being lost.
        self.events = Some(self.transport.subscribe());
        self.identity = Some(identity.clone());

        if let Err(err) = self
            .transport
            .publish(ClientEvent::Join {
                payload: identity.as_participant(),
            })
            .await
        {
            warn!("failed to announce join: {err}");
        }

        match self.history.fetch_messages().await {
            Ok(snapshot) => self.apply_snapshot(snapshot, epoch),
            Err(err) => {
                warn!("historical fetch failed, continuing with live stream only: {err}");
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: Vec<ChatMessage>, epoch: u64) {
        if epoch != self.epoch || self.identity.is_none() {
            debug!("discarding historical snapshot for a stale session");
            return;
        }
        self.log.load_snapshot(snapshot);
    }
}

impl fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSession")
            .field("state", &self.state())
            .field("messages", &self.log.len())
            .field("online", &self.presence.len())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
