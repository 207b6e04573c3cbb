//! SSE-backed implementation of the chat stream.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use shared::models::{ClientEvent, ServerEvent};
use tokio::{
    sync::mpsc,
    time::{Duration, sleep},
};
use tracing::{debug, warn};
use url::Url;

use super::ChatTransport;
use crate::error::TransportError;

/// Stream transport over HTTP: outbound events are posted to
/// `POST api/events`, inbound events arrive as an SSE stream from
/// `GET api/events`.
#[derive(Debug, Clone)]
pub struct SseTransport {
    client: Client,
    api_base: Url,
}

impl SseTransport {
    /// Creates a transport against the given server base URL.
    ///
    /// # Errors
    /// Returns a [`TransportError`] when the API base cannot be formed.
    pub fn new(server_url: &Url) -> Result<Self, TransportError> {
        Ok(Self {
            client: Client::new(),
            api_base: server_url.join("api/")?,
        })
    }

    async fn read_stream(client: &Client, url: Url, tx: &mpsc::UnboundedSender<ServerEvent>) {
        let response = match client.get(url).send().await {
            Ok(resp) => match resp.error_for_status() {
                Ok(ok) => ok,
                Err(err) => {
                    warn!("stream request rejected: {err}");
                    return;
                }
            },
            Err(err) => {
                warn!("stream connection failed: {err}");
                return;
            }
        };

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::default();

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!("stream chunk error: {err}");
                    return;
                }
            };
            for event in decoder.push_chunk(&String::from_utf8_lossy(&bytes)) {
                if tx.send(event).is_err() {
                    // Subscriber dropped the receiver; the session has
                    // unsubscribed.
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl ChatTransport for SseTransport {
    async fn publish(&self, event: ClientEvent) -> Result<(), TransportError> {
        let url = self.api_base.join("events")?;
        self.client
            .post(url)
            .json(&event)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = self.client.clone();
        let stream_url = self.api_base.join("events");

        tokio::spawn(async move {
            let url = match stream_url {
                Ok(url) => url,
                Err(err) => {
                    warn!("invalid stream endpoint: {err}");
                    return;
                }
            };
            while !tx.is_closed() {
                Self::read_stream(&client, url.clone(), &tx).await;
                if tx.is_closed() {
                    break;
                }
                sleep(Duration::from_secs(1)).await;
            }
        });

        rx
    }
}

/// Incremental SSE frame decoder.
///
/// Chunks may split lines and frames arbitrarily; complete lines are
/// drained as they form and a frame is emitted on each blank line.
#[derive(Debug, Default)]
struct SseDecoder {
    pending: String,
    data_buffer: String,
}

impl SseDecoder {
    fn push_chunk(&mut self, text: &str) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        self.pending.push_str(text);

        while let Some(newline) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=newline).collect();
            let trimmed = line.trim_end_matches(['\n', '\r']);

            if let Some(value) = trimmed.strip_prefix("data:") {
                self.data_buffer.push_str(value.trim());
            } else if trimmed.is_empty() {
                if !self.data_buffer.is_empty() && self.data_buffer != "[DONE]" {
                    match serde_json::from_str::<ServerEvent>(&self.data_buffer) {
                        Ok(event) => events.push(event),
                        Err(err) => debug!("ignoring undecodable stream event: {err}"),
                    }
                }
                self.data_buffer.clear();
            }
            // `event:`/`id:`/comment lines carry nothing beyond the tag
            // already embedded in the data payload.
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Participant;

    #[test]
    fn test_decoder_emits_event_on_blank_line() {
        let mut decoder = SseDecoder::default();
        let events = decoder.push_chunk(
            "data: {\"event\":\"userJoined\",\"payload\":{\"userId\":\"u1\",\"userName\":\"Bob\"}}\n\n",
        );

        assert_eq!(
            events,
            vec![ServerEvent::UserJoined {
                payload: Participant {
                    user_id: "u1".to_string(),
                    user_name: "Bob".to_string(),
                },
            }]
        );
    }

    #[test]
    fn test_decoder_handles_frames_split_across_chunks() {
        let mut decoder = SseDecoder::default();
        assert!(
            decoder
                .push_chunk("data: {\"event\":\"userLeft\",\"payload\":{\"userId\":")
                .is_empty()
        );
        let events = decoder.push_chunk("\"u1\",\"userName\":\"Bob\"}}\n\n");

        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_decoder_skips_undecodable_and_done_frames() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push_chunk("data: not json\n\n").is_empty());
        assert!(decoder.push_chunk("data: [DONE]\n\n").is_empty());

        // The decoder keeps working after a bad frame.
        let events = decoder.push_chunk("data: {\"event\":\"onlineUsers\",\"payload\":[]}\n\n");
        assert_eq!(events, vec![ServerEvent::OnlineUsers { payload: vec![] }]);
    }

    #[test]
    fn test_decoder_ignores_event_and_id_lines() {
        let mut decoder = SseDecoder::default();
        let events = decoder.push_chunk(
            "event: onlineUsers\nid: 42\ndata: {\"event\":\"onlineUsers\",\"payload\":[]}\n\n",
        );

        assert_eq!(events, vec![ServerEvent::OnlineUsers { payload: vec![] }]);
    }
}
