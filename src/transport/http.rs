use super::{EventSender, EventSource};
use crate::api::{ApiClient, EventStreamParser};
use crate::types::{ConnectionStatus, ServerEvent};
use anyhow::{bail, Result};
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Remote chat server reached over HTTP with SSE replies.
pub struct HttpTransport {
    client: Arc<ApiClient>,
    events: EventSender,
    cancel: CancellationToken,
}

impl HttpTransport {
    pub fn new(base_url: &str, events: EventSender, cancel: CancellationToken) -> Self {
        Self::from_client(ApiClient::new(base_url), events, cancel)
    }

    pub fn from_client(client: ApiClient, events: EventSender, cancel: CancellationToken) -> Self {
        info!(
            server = client.base_url(),
            local = client.is_local_endpoint(),
            "using remote chat server"
        );
        Self {
            client: Arc::new(client),
            events,
            cancel,
        }
    }
}

impl EventSource for HttpTransport {
    fn connect(&mut self) {
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            let status = tokio::select! {
                _ = cancel.cancelled() => return,
                result = client.probe() => match result {
                    Ok(()) => {
                        info!(server = client.base_url(), "chat server reachable");
                        ConnectionStatus::connected()
                    }
                    Err(error) => {
                        warn!(server = client.base_url(), %error, "chat server probe failed");
                        ConnectionStatus::error(error.to_string())
                    }
                },
            };
            let _ = events.send(ServerEvent::ConnectionState(status));
        });
    }

    fn emit(&mut self, message: &str) -> Result<()> {
        if self.events.is_closed() {
            bail!("event channel closed");
        }

        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        let cancel = self.cancel.clone();
        let message = message.to_string();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => debug!("chat request cancelled"),
                _ = forward_reply(&client, &message, &events) => {}
            }
        });
        Ok(())
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
    }
}

/// Post `message` and forward every decoded event of the reply. A failed
/// request or a broken body is reported as a connection error.
async fn forward_reply(client: &ApiClient, message: &str, events: &EventSender) {
    let mut stream = match client.create_stream(message).await {
        Ok(stream) => stream,
        Err(error) => {
            warn!(%error, "chat request failed");
            let _ = events.send(ServerEvent::ConnectionState(ConnectionStatus::error(
                error.to_string(),
            )));
            return;
        }
    };

    let mut parser = EventStreamParser::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(bytes) => {
                for event in parser.process(&bytes) {
                    if events.send(event).is_err() {
                        return;
                    }
                }
            }
            Err(error) => {
                warn!(%error, "chat reply stream broke");
                let _ = events.send(ServerEvent::ConnectionState(ConnectionStatus::error(
                    error.to_string(),
                )));
                return;
            }
        }
    }

    let rest = parser.flush();
    if !rest.trim().is_empty() {
        debug!(bytes = rest.len(), "discarding incomplete trailing SSE frame");
    }
}
