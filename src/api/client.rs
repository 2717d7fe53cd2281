use crate::util::{is_local_endpoint_url, join_url};
use anyhow::{anyhow, Result};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::json;
use std::pin::Pin;
#[cfg(test)]
use std::sync::Arc;
use std::time::Duration;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

pub const CHAT_STREAM_ROUTE: &str = "/api/chat/stream";
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(test)]
pub trait MockStreamProducer: Send + Sync {
    fn create_mock_stream(&self, message: &str) -> Result<ByteStream>;
}

/// Talks to a remote chat server: a health probe on the base URL and a
/// streaming chat endpoint whose response body is a server-sent event stream.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    #[cfg(test)]
    mock_stream_producer: Option<Arc<dyn MockStreamProducer>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            #[cfg(test)]
            mock_stream_producer: None,
        }
    }

    #[cfg(test)]
    pub fn new_mock(mock_producer: Arc<dyn MockStreamProducer>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "http://localhost:3001".to_string(),
            mock_stream_producer: Some(mock_producer),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_local_endpoint(&self) -> bool {
        is_local_endpoint_url(&self.base_url)
    }

    /// Check that the server answers at all.
    pub async fn probe(&self) -> Result<()> {
        #[cfg(test)]
        {
            if self.mock_stream_producer.is_some() {
                return Ok(());
            }
        }

        self.http
            .get(&self.base_url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|error| map_api_request_error(error, &self.base_url))?
            .error_for_status()
            .map_err(|error| map_api_request_error(error, &self.base_url))?;
        Ok(())
    }

    /// Post a user message and return the raw event stream of the reply.
    pub async fn create_stream(&self, message: &str) -> Result<ByteStream> {
        #[cfg(test)]
        {
            if let Some(producer) = &self.mock_stream_producer {
                return producer.create_mock_stream(message);
            }
        }

        let request_url = join_url(&self.base_url, CHAT_STREAM_ROUTE);
        let response = self
            .http
            .post(&request_url)
            .header("accept", "text/event-stream")
            .json(&json!({ "message": message }))
            .send()
            .await
            .map_err(|error| map_api_request_error(error, &request_url))?
            .error_for_status()
            .map_err(|error| map_api_request_error(error, &request_url))?;

        let request_url_for_stream = request_url.clone();
        let stream = response.bytes_stream().map(move |item| {
            item.map_err(|error| map_api_request_error(error, &request_url_for_stream))
        });
        Ok(Box::pin(stream))
    }
}

fn map_api_request_error(error: reqwest::Error, request_url: &str) -> anyhow::Error {
    if error.is_connect() && is_local_endpoint_url(request_url) {
        return anyhow!(
            "cannot reach local chat server '{}': {}. Start the backend or update DCHAT_SERVER_URL.",
            request_url,
            error
        );
    }
    if error.is_connect() {
        return anyhow!("cannot reach chat server '{}': {}", request_url, error);
    }
    if error.is_timeout() {
        return anyhow!("request to '{}' timed out: {}", request_url, error);
    }
    if let Some(status) = error.status() {
        return anyhow!(
            "chat server '{}' returned HTTP {}: {}",
            request_url,
            status,
            error
        );
    }
    anyhow!("request to '{}' failed: {}", request_url, error)
}
