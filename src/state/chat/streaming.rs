use super::super::message::Message;
use super::ChatStore;
use crate::types::Sender;
use tracing::warn;

impl ChatStore {
    /// Fold one assistant chunk into the transcript.
    ///
    /// Chunks are concatenated in arrival order; the transport owns ordering.
    pub fn apply_assistant_chunk(
        &mut self,
        id: impl Into<String>,
        text: &str,
        sender: Sender,
        is_first: bool,
    ) {
        let id = id.into();
        if !is_first {
            if let Some(message) = self.message_mut(&id) {
                message.text.push_str(text);
                message.streaming = true;
                return;
            }
        }

        self.push_message(Message::streaming(id, text.to_string(), sender));
    }

    /// Close out an assistant message with the server's authoritative text.
    ///
    /// An end with no preceding chunk still produces a finished message.
    pub fn apply_assistant_end(
        &mut self,
        id: impl Into<String>,
        sender: Sender,
        full_text: impl Into<String>,
    ) {
        let id = id.into();
        let full_text = full_text.into();
        if let Some(message) = self.message_mut(&id) {
            message.text = full_text;
            message.streaming = false;
            return;
        }

        warn!(message_id = %id, "chat_end without prior chunks; synthesizing message");
        self.push_message(Message::terminal(id, full_text, sender));
    }
}
