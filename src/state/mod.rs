mod artifact;
mod chat;
mod message;

pub use artifact::{Artifact, ArtifactBody, DEFAULT_CODE_LANGUAGE, DEFAULT_DATA_FORMAT};
pub use chat::{ChatState, ChatStore, CONNECT_ERROR_TEXT};
pub use message::Message;
