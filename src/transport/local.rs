use super::{deliver_paced, EventSender, EventSource, StreamOptions};
use crate::resolver::{ArtifactResolver, ReplyComposer};
use crate::types::{ConnectionStatus, Sender, ServerEvent};
use anyhow::{bail, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

/// Prefix that asks for an artifact only, with no chat reply.
pub const ARTIFACT_COMMAND: &str = "/artifact";

/// Answers messages in-process with the canned reply and catalog artifacts.
pub struct LocalTransport {
    resolver: Arc<ArtifactResolver>,
    replies: Arc<ReplyComposer>,
    options: StreamOptions,
    events: EventSender,
    cancel: CancellationToken,
}

impl LocalTransport {
    pub fn new(
        resolver: Arc<ArtifactResolver>,
        options: StreamOptions,
        events: EventSender,
        cancel: CancellationToken,
    ) -> Result<Self> {
        Ok(Self {
            resolver,
            replies: Arc::new(ReplyComposer::new()?),
            options,
            events,
            cancel,
        })
    }
}

impl EventSource for LocalTransport {
    fn connect(&mut self) {
        if self
            .events
            .send(ServerEvent::ConnectionState(ConnectionStatus::connected()))
            .is_err()
        {
            warn!("event channel closed before the local transport connected");
        }
    }

    fn emit(&mut self, message: &str) -> Result<()> {
        if self.events.is_closed() {
            bail!("event channel closed");
        }

        let events = plan_reply(
            &self.resolver,
            &self.replies,
            message,
            self.options.streaming,
        );
        let sender = self.events.clone();
        let cancel = self.cancel.clone();
        let pacing = self.options.pacing();
        tokio::spawn(async move {
            if !deliver_paced(events, &sender, pacing, &cancel).await {
                debug!("local reply delivery stopped before completion");
            }
        });
        Ok(())
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
    }
}

/// Every event the local backend sends in answer to `message`.
///
/// A regular message gets the canned reply (word chunks when streaming, one
/// chunk otherwise) followed by the matching catalog artifact, if any.
/// `/artifact <query>` yields only an artifact, falling back to the
/// "no match" message artifact.
pub fn plan_reply(
    resolver: &ArtifactResolver,
    replies: &ReplyComposer,
    message: &str,
    streaming: bool,
) -> Vec<ServerEvent> {
    if let Some(query) = artifact_query(message) {
        return resolver.stream(query, new_id("artifact"));
    }

    let reply_id = new_id("reply");
    let reply = replies.reply(message);
    let pieces: Vec<&str> = if streaming {
        reply.split_inclusive(' ').collect()
    } else {
        vec![reply.as_str()]
    };

    let mut events: Vec<ServerEvent> = pieces
        .into_iter()
        .enumerate()
        .map(|(index, piece)| ServerEvent::ChatChunk {
            id: reply_id.clone(),
            text: piece.to_string(),
            sender: Sender::Assistant,
            is_first_chunk: index == 0,
        })
        .collect();
    events.push(ServerEvent::ChatEnd {
        id: reply_id,
        sender: Sender::Assistant,
        full_response: reply.clone(),
    });

    if let Some(payload) = resolver.matching(message) {
        events.extend(payload.into_events(new_id("artifact")));
    }
    events
}

fn artifact_query(message: &str) -> Option<&str> {
    let rest = message.trim().strip_prefix(ARTIFACT_COMMAND)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn new_id(kind: &str) -> String {
    format!("{kind}-{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ArtifactBody, ChatStore};
    use crate::types::ArtifactKind;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn fixtures() -> (ArtifactResolver, ReplyComposer) {
        (ArtifactResolver::new().unwrap(), ReplyComposer::new().unwrap())
    }

    #[test]
    fn test_plain_message_streams_reply_words() {
        let (resolver, replies) = fixtures();
        let events = plan_reply(&resolver, &replies, "hello there", true);

        let expected = replies.reply("hello there");
        let mut store = ChatStore::new();
        let mut saw_partial = false;
        for event in events {
            store.apply(event);
            if let Some(message) = store.messages().last() {
                saw_partial |= message.streaming && message.text.len() < expected.len();
            }
        }

        assert!(saw_partial);
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.messages()[0].text, expected);
        assert!(!store.messages()[0].streaming);
        assert!(store.active_artifact().is_none());
    }

    #[test]
    fn test_non_streaming_reply_is_one_chunk() {
        let (resolver, replies) = fixtures();
        let events = plan_reply(&resolver, &replies, "hello", false);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            ServerEvent::ChatChunk { is_first_chunk: true, .. }
        ));
        assert!(matches!(&events[1], ServerEvent::ChatEnd { .. }));
    }

    #[test]
    fn test_keyword_message_appends_artifact_after_reply() {
        let (resolver, replies) = fixtures();
        let events = plan_reply(&resolver, &replies, "generate sales data table", true);

        let end_position = events
            .iter()
            .position(|event| matches!(event, ServerEvent::ChatEnd { .. }))
            .unwrap();
        assert!(matches!(
            events.get(end_position + 1),
            Some(ServerEvent::ArtifactStart {
                artifact_type: ArtifactKind::Data,
                ..
            })
        ));
        assert!(matches!(events.last(), Some(ServerEvent::ArtifactEnd { .. })));
    }

    #[test]
    fn test_artifact_command_skips_reply_and_falls_back_to_message() {
        let (resolver, replies) = fixtures();

        let events = plan_reply(&resolver, &replies, "/artifact weather", true);
        assert!(events
            .iter()
            .all(|event| !matches!(event, ServerEvent::ChatChunk { .. } | ServerEvent::ChatEnd { .. })));
        assert!(matches!(
            events.first(),
            Some(ServerEvent::ArtifactStart {
                artifact_type: ArtifactKind::Message,
                ..
            })
        ));

        assert_eq!(artifact_query("/artifact"), Some(""));
        assert_eq!(artifact_query("  /artifact  sql "), Some("sql"));
        assert_eq!(artifact_query("/artifacts"), None);
    }

    #[tokio::test]
    async fn test_emit_delivers_reply_and_artifact_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let options = StreamOptions {
            streaming: true,
            chunk_delay: Duration::from_millis(1),
        };
        let mut transport = LocalTransport::new(
            Arc::new(ArtifactResolver::new().unwrap()),
            options,
            tx,
            CancellationToken::new(),
        )
        .unwrap();

        transport.connect();
        transport.emit("show me the sql query").unwrap();

        let mut store = ChatStore::new();
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("events arrive")
                .expect("channel open");
            let done = matches!(event, ServerEvent::ArtifactEnd { .. });
            store.apply(event);
            if done {
                break;
            }
        }

        assert!(store.is_connected());
        assert_eq!(store.messages().len(), 1);
        assert!(!store.messages()[0].streaming);
        let artifact = store.active_artifact().unwrap();
        assert!(!artifact.streaming);
        assert!(matches!(
            &artifact.body,
            ArtifactBody::Code { language, .. } if language == "sql"
        ));
        assert_eq!(store.dropped_events(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let options = StreamOptions {
            streaming: true,
            chunk_delay: Duration::from_secs(60),
        };
        let mut transport = LocalTransport::new(
            Arc::new(ArtifactResolver::new().unwrap()),
            options,
            tx,
            CancellationToken::new(),
        )
        .unwrap();

        transport.emit("hello there friend").unwrap();
        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(first, ServerEvent::ChatChunk { is_first_chunk: true, .. }));

        transport.shutdown();
        drop(transport);
        let rest = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap();
        assert_eq!(rest, None);
    }
}
