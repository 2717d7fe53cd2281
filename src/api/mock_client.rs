use crate::api::client::{ByteStream, MockStreamProducer};
use anyhow::Result;
use bytes::Bytes;
use futures::stream;
use std::sync::{Arc, Mutex};

/// Replays canned SSE frames, one response per `create_stream` call.
#[derive(Clone)]
pub struct MockApiClient {
    responses: Arc<Mutex<Vec<Vec<String>>>>,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockApiClient {
    pub fn new(responses: Vec<Vec<String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue one more response behind the configured ones.
    pub fn push_response(&self, frames: Vec<String>) {
        self.responses.lock().unwrap().push(frames);
    }

    /// Messages posted so far, in order.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl MockStreamProducer for MockApiClient {
    fn create_mock_stream(&self, message: &str) -> Result<ByteStream> {
        self.received.lock().unwrap().push(message.to_string());

        let mut responses_guard = self.responses.lock().unwrap();
        if responses_guard.is_empty() {
            return Err(anyhow::anyhow!(
                "MockApiClient: No more responses configured"
            ));
        }
        let frames = responses_guard.remove(0);

        let byte_chunks: Vec<Result<Bytes>> = frames
            .into_iter()
            .map(|frame| {
                let framed = if frame.ends_with("\n\n") {
                    frame
                } else {
                    format!("{frame}\n\n")
                };
                Ok(Bytes::from(framed))
            })
            .collect();

        Ok(Box::pin(stream::iter(byte_chunks)))
    }
}
