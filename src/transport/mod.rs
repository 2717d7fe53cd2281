//! Event sources feeding the chat store.
//!
//! A transport pushes [`ServerEvent`]s, connection notifications included,
//! into one unbounded channel. The runtime loop drains that channel, so all
//! store mutation happens on a single task, in delivery order.

mod http;
mod local;

pub use http::HttpTransport;
pub use local::{plan_reply, LocalTransport};

use crate::config::Config;
use crate::resolver::ArtifactResolver;
use crate::types::ServerEvent;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub type EventSender = mpsc::UnboundedSender<ServerEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<ServerEvent>;

/// Duplex channel to the chat backend.
pub trait EventSource: Send {
    /// Start connecting; the outcome arrives as a `connection_state` event.
    fn connect(&mut self);

    /// Send a user message. Replies arrive as events.
    fn emit(&mut self, message: &str) -> Result<()>;

    /// Stop in-flight deliveries. Events already queued stay queued.
    fn shutdown(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    pub streaming: bool,
    pub chunk_delay: Duration,
}

impl StreamOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            streaming: config.streaming,
            chunk_delay: config.chunk_delay,
        }
    }

    /// Pause between consecutive events of one reply.
    pub fn pacing(&self) -> Duration {
        if self.streaming {
            self.chunk_delay
        } else {
            Duration::ZERO
        }
    }
}

/// Pick the transport the configuration asks for.
pub fn build_event_source(
    config: &Config,
    events: EventSender,
    cancel: CancellationToken,
) -> Result<Box<dyn EventSource>> {
    let options = StreamOptions::from_config(config);
    match &config.server_url {
        Some(url) => Ok(Box::new(HttpTransport::new(url, events, cancel))),
        None => {
            let resolver = Arc::new(ArtifactResolver::new()?);
            Ok(Box::new(LocalTransport::new(resolver, options, events, cancel)?))
        }
    }
}

/// Forward `events` in order, pausing `pacing` between them, until done or
/// cancelled. Returns false when the receiver is gone or the send was
/// cancelled.
pub(crate) async fn deliver_paced(
    events: Vec<ServerEvent>,
    sender: &EventSender,
    pacing: Duration,
    cancel: &CancellationToken,
) -> bool {
    for (index, event) in events.into_iter().enumerate() {
        if index > 0 && !pacing.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => return false,
                _ = tokio::time::sleep(pacing) => {}
            }
        }
        if cancel.is_cancelled() || sender.send(event).is_err() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectionStatus;

    #[test]
    fn test_pacing_is_zero_when_not_streaming() {
        let options = StreamOptions {
            streaming: false,
            chunk_delay: Duration::from_millis(80),
        };
        assert_eq!(options.pacing(), Duration::ZERO);

        let streaming = StreamOptions {
            streaming: true,
            ..options
        };
        assert_eq!(streaming.pacing(), Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_deliver_paced_stops_when_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let delivered = deliver_paced(
            vec![ServerEvent::ConnectionState(ConnectionStatus::connected())],
            &tx,
            Duration::ZERO,
            &cancel,
        )
        .await;

        assert!(!delivered);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_build_event_source_defaults_to_local() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut source =
            build_event_source(&Config::default(), tx, CancellationToken::new()).unwrap();
        source.connect();
        assert_eq!(
            rx.recv().await,
            Some(ServerEvent::ConnectionState(ConnectionStatus::connected()))
        );
    }
}
