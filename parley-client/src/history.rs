//! One-shot historical fetch and best-effort persistence of messages.

use async_trait::async_trait;
use reqwest::Client;
use shared::models::{ChatMessage, HistoryResponse};
use url::Url;

use crate::error::TransportError;

/// Request/response collaborator holding the room's message history.
#[async_trait]
pub trait HistoryService: Send + Sync {
    /// Fetches the full message history, oldest first.
    ///
    /// # Errors
    /// Returns a [`TransportError`] when the fetch fails or the service
    /// reports an unsuccessful result.
    async fn fetch_messages(&self) -> Result<Vec<ChatMessage>, TransportError>;

    /// Durably persists one outgoing message, best-effort. Callers log
    /// failures and continue; no correctness depends on this call.
    ///
    /// # Errors
    /// Returns a [`TransportError`] when the request fails.
    async fn persist_message(&self, message: &ChatMessage) -> Result<(), TransportError>;
}

/// HTTP history client talking to `GET api/messages` and `POST api/send`.
#[derive(Debug, Clone)]
pub struct HttpHistoryClient {
    client: Client,
    api_base: Url,
}

impl HttpHistoryClient {
    /// Creates a client against the given server base URL.
    ///
    /// # Errors
    /// Returns a [`TransportError`] when the API base cannot be formed.
    pub fn new(server_url: &Url) -> Result<Self, TransportError> {
        Ok(Self {
            client: Client::new(),
            api_base: server_url.join("api/")?,
        })
    }
}

#[async_trait]
impl HistoryService for HttpHistoryClient {
    async fn fetch_messages(&self) -> Result<Vec<ChatMessage>, TransportError> {
        let url = self.api_base.join("messages")?;
        let response: HistoryResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.success {
            return Err(TransportError::HistoryRejected);
        }
        Ok(response.data)
    }

    async fn persist_message(&self, message: &ChatMessage) -> Result<(), TransportError> {
        let url = self.api_base.join("send")?;
        self.client
            .post(url)
            .json(message)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
