use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Who authored a transcript entry.
///
/// `ai` and `ai_error` are the names older servers put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sender {
    User,
    #[serde(alias = "ai")]
    Assistant,
    #[serde(alias = "ai_error", alias = "assistant_error")]
    AssistantError,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "Assistant",
            Sender::AssistantError => "Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Code,
    Data,
    Message,
}

/// Payload of an `artifact_chunk` event: text for code/message artifacts,
/// a table row for data artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkData {
    Text(String),
    Row(Vec<Value>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionStatus {
    pub fn connected() -> Self {
        Self {
            connected: true,
            error: None,
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            connected: false,
            error: Some(reason.into()),
        }
    }
}

/// Every event a transport can deliver to the chat store.
///
/// The serialized form carries the event name under `event`; over SSE the
/// name travels on the `event:` line instead and the tag is stripped from
/// the `data:` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    ChatChunk {
        id: String,
        text: String,
        sender: Sender,
        #[serde(default)]
        is_first_chunk: bool,
    },
    ChatEnd {
        id: String,
        sender: Sender,
        full_response: String,
    },
    ArtifactStart {
        artifact_id: String,
        artifact_type: ArtifactKind,
        #[serde(default)]
        metadata: Map<String, Value>,
    },
    ArtifactChunk {
        artifact_id: String,
        chunk_data: ChunkData,
    },
    ArtifactEnd {
        artifact_id: String,
    },
    ConnectionState(ConnectionStatus),
}

pub const EVENT_NAMES: [&str; 6] = [
    "chat_chunk",
    "chat_end",
    "artifact_start",
    "artifact_chunk",
    "artifact_end",
    "connection_state",
];

#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("unknown event name '{0}'")]
    UnknownEvent(String),
    #[error("event '{0}' payload must be a JSON object")]
    NotAnObject(String),
    #[error("event '{name}' payload is malformed: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::ChatChunk { .. } => "chat_chunk",
            ServerEvent::ChatEnd { .. } => "chat_end",
            ServerEvent::ArtifactStart { .. } => "artifact_start",
            ServerEvent::ArtifactChunk { .. } => "artifact_chunk",
            ServerEvent::ArtifactEnd { .. } => "artifact_end",
            ServerEvent::ConnectionState(_) => "connection_state",
        }
    }

    /// Decode an event from its name and untagged JSON payload.
    pub fn decode(name: &str, data: &str) -> Result<Self, EventDecodeError> {
        if !EVENT_NAMES.contains(&name) {
            return Err(EventDecodeError::UnknownEvent(name.to_string()));
        }

        let json_error = |source| EventDecodeError::Json {
            name: name.to_string(),
            source,
        };
        let mut payload = match serde_json::from_str::<Value>(data).map_err(json_error)? {
            Value::Object(payload) => payload,
            _ => return Err(EventDecodeError::NotAnObject(name.to_string())),
        };
        payload.insert("event".to_string(), Value::String(name.to_string()));
        serde_json::from_value(Value::Object(payload)).map_err(json_error)
    }

    /// Frame this event the way the streaming chat endpoint sends it.
    pub fn to_sse_frame(&self) -> String {
        let mut payload = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(fields) = &mut payload {
            fields.remove("event");
        }
        format!("event: {}\ndata: {}\n\n", self.name(), payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chunk_data_distinguishes_text_from_rows() {
        let text: ChunkData = serde_json::from_value(json!("SELECT 1;\n")).unwrap();
        assert_eq!(text, ChunkData::Text("SELECT 1;\n".to_string()));

        let row: ChunkData = serde_json::from_value(json!(["Q1", 150000, null])).unwrap();
        assert_eq!(row, ChunkData::Row(vec![json!("Q1"), json!(150000), Value::Null]));
    }

    #[test]
    fn test_sender_accepts_legacy_wire_names() {
        let ai: Sender = serde_json::from_value(json!("ai")).unwrap();
        let ai_error: Sender = serde_json::from_value(json!("ai_error")).unwrap();
        let current: Sender = serde_json::from_value(json!("assistant-error")).unwrap();
        assert_eq!(ai, Sender::Assistant);
        assert_eq!(ai_error, Sender::AssistantError);
        assert_eq!(current, Sender::AssistantError);
    }

    #[test]
    fn test_decode_attaches_event_name() {
        let event = ServerEvent::decode(
            "artifact_start",
            r#"{"artifact_id":"a1","artifact_type":"data","metadata":{"columns":["x","y"]}}"#,
        )
        .expect("artifact_start should decode");

        match event {
            ServerEvent::ArtifactStart {
                artifact_id,
                artifact_type,
                metadata,
            } => {
                assert_eq!(artifact_id, "a1");
                assert_eq!(artifact_type, ArtifactKind::Data);
                assert_eq!(metadata.get("columns"), Some(&json!(["x", "y"])));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_defaults_missing_metadata_and_first_chunk_flag() {
        let start =
            ServerEvent::decode("artifact_start", r#"{"artifact_id":"a","artifact_type":"code"}"#)
                .unwrap();
        assert!(matches!(
            start,
            ServerEvent::ArtifactStart { ref metadata, .. } if metadata.is_empty()
        ));

        let chunk = ServerEvent::decode(
            "chat_chunk",
            r#"{"id":"m","text":"hi","sender":"assistant"}"#,
        )
        .unwrap();
        assert!(matches!(
            chunk,
            ServerEvent::ChatChunk {
                is_first_chunk: false,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_names_and_bad_payloads() {
        assert!(matches!(
            ServerEvent::decode("ai_message", "{}"),
            Err(EventDecodeError::UnknownEvent(_))
        ));
        assert!(matches!(
            ServerEvent::decode("artifact_end", "[1,2]"),
            Err(EventDecodeError::NotAnObject(_))
        ));
        assert!(matches!(
            ServerEvent::decode("artifact_end", r#"{"id":"wrong-field"}"#),
            Err(EventDecodeError::Json { .. })
        ));
    }

    #[test]
    fn test_connection_state_decodes_error_form() {
        let event =
            ServerEvent::decode("connection_state", r#"{"error":"refused"}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::ConnectionState(ConnectionStatus::error("refused"))
        );
    }

    #[test]
    fn test_sse_frame_strips_tag_from_payload() {
        let frame = ServerEvent::ArtifactEnd {
            artifact_id: "a9".to_string(),
        }
        .to_sse_frame();
        assert_eq!(frame, "event: artifact_end\ndata: {\"artifact_id\":\"a9\"}\n\n");
    }
}
