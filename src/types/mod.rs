mod events;

pub use events::{
    ArtifactKind, ChunkData, ConnectionStatus, EventDecodeError, Sender, ServerEvent, EVENT_NAMES,
};
