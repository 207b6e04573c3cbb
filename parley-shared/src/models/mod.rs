//! Wire models exchanged with the chat collaborators.

pub mod events;
pub mod message;
pub mod presence;
pub mod timestamp;

pub use events::{ClientEvent, HistoryResponse, ServerEvent};
pub use message::{ChatMessage, SYSTEM_USER_ID};
pub use presence::Participant;
pub use timestamp::Timestamp;
