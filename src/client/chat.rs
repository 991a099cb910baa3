//! Streaming chat endpoint client.

use reqwest::Client;

use super::{ApiError, ApiResult};
use crate::session::ChatRequest;
use crate::stream::{StreamEvent, StreamParser};

/// Client for the chat backend's streaming endpoint
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    /// Create a client for a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing connection pool
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{}{}", base, path)
    }

    /// Send one user message and stream the decoded events into `on_event`
    ///
    /// The sink always receives a terminal event: [`StreamEvent::Closed`]
    /// when the stream completes, [`StreamEvent::Aborted`] when the request
    /// fails or the transport drops mid-stream (the error is also returned,
    /// for logging). Individual malformed records never abort the stream.
    pub async fn send_message<F>(&self, request: &ChatRequest, mut on_event: F) -> ApiResult<()>
    where
        F: FnMut(StreamEvent),
    {
        let url = self.api_url("/dashboard/payload");
        let response = match self
            .client
            .post(&url)
            .header("Cache-Control", "no-cache")
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                on_event(StreamEvent::Aborted);
                return Err(err.into());
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log::error!("chat endpoint answered {status}: {body}");
            on_event(StreamEvent::Aborted);
            return Err(ApiError::Status { status, body });
        }

        StreamParser::new()
            .run(Box::pin(response.bytes_stream()), on_event)
            .await
            .map_err(ApiError::from)
    }
}
