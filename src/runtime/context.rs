use crate::state::ChatStore;
use crate::transport::EventSource;
use crate::types::ServerEvent;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const NOT_CONNECTED_TEXT: &str = "Error: Not connected to chat server. Message not sent.";

/// Owned runtime state handed to every `RuntimeMode` callback: the chat store
/// and the transport that feeds it.
pub struct RuntimeContext {
    store: ChatStore,
    transport: Box<dyn EventSource>,
    cancel: CancellationToken,
}

impl RuntimeContext {
    pub fn new(transport: Box<dyn EventSource>, cancel: CancellationToken) -> Self {
        Self {
            store: ChatStore::new(),
            transport,
            cancel,
        }
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    pub fn connect(&mut self) {
        self.transport.connect();
    }

    /// Log a user message and hand it to the transport.
    ///
    /// Blank input is ignored. While disconnected the message is still logged,
    /// followed by an error entry instead of a send, and the transport starts
    /// a fresh connection attempt so a later retry can go through. Returns the
    /// id of the logged user message.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        let id = self.store.apply_user_message(text);
        if !self.store.is_connected() {
            warn!("message submitted while disconnected; reconnecting");
            self.store.apply_local_error("not-sent", NOT_CONNECTED_TEXT);
            self.transport.connect();
            return Some(id);
        }

        if let Err(error) = self.transport.emit(text) {
            warn!(%error, "failed to hand message to transport");
            self.store.apply_local_error("not-sent", NOT_CONNECTED_TEXT);
        }
        Some(id)
    }

    pub fn apply(&mut self, event: ServerEvent) {
        self.store.apply(event);
    }

    pub fn close_artifact(&mut self) {
        self.store.close_artifact();
    }

    pub fn clear_log(&mut self) {
        self.store.clear_log();
    }

    pub fn shutdown(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }
        debug!("shutting down chat transport");
        self.cancel.cancel();
        self.transport.shutdown();
    }
}
