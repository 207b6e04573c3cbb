//! Synchronization core for the Parley chat client.
//!
//! The entry point is [`session::SyncSession`], which reconciles three
//! asynchronously-arriving sources into one consistent view: a one-shot
//! historical fetch ([`history::HistoryService`]), a push stream of new
//! messages, and a presence stream of join/leave/roster events (both via
//! [`transport::ChatTransport`]). Local identity is bootstrapped from and
//! torn down through [`identity::IdentityStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod history;
pub mod identity;
pub mod message_log;
pub mod presence;
pub mod session;
pub mod transport;

pub use error::{IdentityError, SessionError, TransportError};
pub use identity::{FileIdentityStore, Identity, IdentityStore};
pub use message_log::MessageLog;
pub use presence::PresenceTracker;
pub use session::{SessionState, SyncSession};
