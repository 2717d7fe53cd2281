use crate::types::Sender;
use serde::{Deserialize, Serialize};

/// One transcript entry. `streaming` stays true until the matching
/// `chat_end` arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub streaming: bool,
}

impl Message {
    pub(crate) fn terminal(id: String, text: String, sender: Sender) -> Self {
        Self {
            id,
            text,
            sender,
            streaming: false,
        }
    }

    pub(crate) fn streaming(id: String, text: String, sender: Sender) -> Self {
        Self {
            id,
            text,
            sender,
            streaming: true,
        }
    }
}
