use super::super::artifact::Artifact;
use super::super::message::Message;
use crate::types::{Sender, ServerEvent};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Everything the transcript and the artifact panel render from.
///
/// Two `ChatState`s compare equal exactly when they would render the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    pub(super) messages: Vec<Message>,
    /// Message id to its position in `messages`. When a first chunk reuses
    /// an id, the entry points at the newest message.
    pub(super) message_index: HashMap<String, usize>,
    pub(super) active_artifact: Option<Artifact>,
    pub(super) artifact_visible: bool,
    pub(super) connected: bool,
}

impl ChatState {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn active_artifact(&self) -> Option<&Artifact> {
        self.active_artifact.as_ref()
    }

    pub fn is_artifact_visible(&self) -> bool {
        self.artifact_visible
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Folds transport events and user actions into [`ChatState`].
///
/// This is the only mutation path for the transcript and the artifact slot.
/// Every operation runs to completion synchronously; the runtime loop is the
/// single caller.
#[derive(Debug, Default)]
pub struct ChatStore {
    pub(super) state: ChatState,
    /// Chunk/end events dropped for a stale id or a payload of the wrong shape.
    pub(super) dropped_events: u64,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn messages(&self) -> &[Message] {
        self.state.messages()
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.state
            .message_index
            .get(id)
            .and_then(|position| self.state.messages.get(*position))
    }

    pub fn active_artifact(&self) -> Option<&Artifact> {
        self.state.active_artifact()
    }

    pub fn is_artifact_visible(&self) -> bool {
        self.state.is_artifact_visible()
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    /// Record a submission from the local user. Returns the generated id.
    pub fn apply_user_message(&mut self, text: impl Into<String>) -> String {
        let id = format!("{}-user", Uuid::new_v4());
        self.push_message(Message::terminal(id.clone(), text.into(), Sender::User));
        id
    }

    /// Append a finished error entry raised on this side of the transport.
    pub fn apply_local_error(&mut self, kind: &str, text: impl Into<String>) -> String {
        let id = format!("{}-{kind}", Uuid::new_v4());
        self.push_message(Message::terminal(
            id.clone(),
            text.into(),
            Sender::AssistantError,
        ));
        id
    }

    pub fn clear_log(&mut self) {
        self.state.messages.clear();
        self.state.message_index.clear();
    }

    /// Route a decoded transport event to the matching operation.
    pub fn apply(&mut self, event: ServerEvent) {
        debug!(event = event.name(), "applying server event");
        match event {
            ServerEvent::ChatChunk {
                id,
                text,
                sender,
                is_first_chunk,
            } => self.apply_assistant_chunk(id, &text, sender, is_first_chunk),
            ServerEvent::ChatEnd {
                id,
                sender,
                full_response,
            } => self.apply_assistant_end(id, sender, full_response),
            ServerEvent::ArtifactStart {
                artifact_id,
                artifact_type,
                metadata,
            } => self.apply_artifact_start(artifact_id, artifact_type, &metadata),
            ServerEvent::ArtifactChunk {
                artifact_id,
                chunk_data,
            } => self.apply_artifact_chunk(&artifact_id, chunk_data),
            ServerEvent::ArtifactEnd { artifact_id } => self.apply_artifact_end(&artifact_id),
            ServerEvent::ConnectionState(status) => self.apply_connection(status),
        }
    }

    pub(super) fn push_message(&mut self, message: Message) {
        self.state
            .message_index
            .insert(message.id.clone(), self.state.messages.len());
        self.state.messages.push(message);
    }

    pub(super) fn message_mut(&mut self, id: &str) -> Option<&mut Message> {
        let position = *self.state.message_index.get(id)?;
        self.state.messages.get_mut(position)
    }

    pub(super) fn record_drop(&mut self) {
        self.dropped_events = self.dropped_events.saturating_add(1);
    }
}
