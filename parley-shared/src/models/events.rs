use serde::{Deserialize, Serialize};

use super::{ChatMessage, Participant};

/// Events delivered on the inbound message/presence stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ServerEvent {
    /// A new chat message broadcast to the room.
    #[serde(rename = "message")]
    Message {
        /// The broadcast message.
        payload: ChatMessage,
    },
    /// A participant joined the room.
    #[serde(rename = "userJoined")]
    UserJoined {
        /// The joining participant.
        payload: Participant,
    },
    /// A participant left the room.
    #[serde(rename = "userLeft")]
    UserLeft {
        /// The departing participant.
        payload: Participant,
    },
    /// Full roster snapshot; replaces any incrementally-built view.
    #[serde(rename = "onlineUsers")]
    OnlineUsers {
        /// Everyone currently online.
        payload: Vec<Participant>,
    },
}

/// Events published outward on the stream, fire-and-forget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ClientEvent {
    /// Announce this identity as joined.
    #[serde(rename = "join")]
    Join {
        /// The local identity.
        payload: Participant,
    },
    /// Send a chat message to the room.
    #[serde(rename = "message")]
    Message {
        /// The outgoing message.
        payload: ChatMessage,
    },
    /// Announce this identity as departed.
    #[serde(rename = "left")]
    Left {
        /// The local identity.
        payload: Participant,
    },
}

/// Response body of the one-shot historical message fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryResponse {
    /// Whether the fetch succeeded server-side.
    pub success: bool,
    /// Messages in server storage order, oldest first.
    pub data: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timestamp;
    use chrono::{TimeZone, Utc};

    fn sample_message() -> ChatMessage {
        ChatMessage {
            user_id: "u-1".to_string(),
            user_name: "Alice".to_string(),
            message_body: "hi".to_string(),
            time_stamp: Timestamp(Utc.with_ymd_and_hms(2025, 3, 8, 14, 30, 0).unwrap()),
        }
    }

    #[test]
    fn test_server_event_tag_names() {
        let joined = ServerEvent::UserJoined {
            payload: Participant {
                user_id: "u-2".to_string(),
                user_name: "Bob".to_string(),
            },
        };
        let serialized = serde_json::to_string(&joined).unwrap();
        assert!(serialized.contains("\"event\":\"userJoined\""));

        let roster = ServerEvent::OnlineUsers { payload: vec![] };
        let serialized = serde_json::to_string(&roster).unwrap();
        assert!(serialized.contains("\"event\":\"onlineUsers\""));
    }

    #[test]
    fn test_server_event_message_round_trip() {
        let event = ServerEvent::Message {
            payload: sample_message(),
        };
        let serialized = serde_json::to_string(&event).unwrap();
        let deserialized: ServerEvent = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, event);
    }

    #[test]
    fn test_client_event_tag_names() {
        let join = ClientEvent::Join {
            payload: Participant {
                user_id: "u-1".to_string(),
                user_name: "Alice".to_string(),
            },
        };
        let serialized = serde_json::to_string(&join).unwrap();
        assert!(serialized.contains("\"event\":\"join\""));

        let left = ClientEvent::Left {
            payload: Participant {
                user_id: "u-1".to_string(),
                user_name: "Alice".to_string(),
            },
        };
        let serialized = serde_json::to_string(&left).unwrap();
        assert!(serialized.contains("\"event\":\"left\""));
    }

    #[test]
    fn test_history_response_decoding() {
        let body = r#"{
            "success": true,
            "data": [{
                "userId": "u-1",
                "userName": "Alice",
                "messageBody": "hi",
                "timeStamp": "2025-03-08T14:30:00Z"
            }]
        }"#;
        let response: HistoryResponse = serde_json::from_str(body).unwrap();

        assert!(response.success);
        assert_eq!(response.data, vec![sample_message()]);
    }
}
