use crate::types::ArtifactKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_CODE_LANGUAGE: &str = "plaintext";
pub const DEFAULT_DATA_FORMAT: &str = "json";

/// The artifact currently shown in the side panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub streaming: bool,
    #[serde(flatten)]
    pub body: ArtifactBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactBody {
    /// Source snippet; grows by appending text chunks.
    Code { language: String, content: String },
    /// Table; columns are fixed at start, rows grow by appending row chunks.
    Data {
        format: String,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    /// Plain text; grows by appending text chunks.
    Message { content: String },
}

impl Artifact {
    /// Build the empty, still-streaming artifact announced by an
    /// `artifact_start` event.
    pub fn from_start(id: String, kind: ArtifactKind, metadata: &Map<String, Value>) -> Self {
        let body = match kind {
            ArtifactKind::Code => ArtifactBody::Code {
                language: metadata_str(metadata, "language")
                    .unwrap_or(DEFAULT_CODE_LANGUAGE)
                    .to_string(),
                content: String::new(),
            },
            ArtifactKind::Data => ArtifactBody::Data {
                format: metadata_str(metadata, "format")
                    .unwrap_or(DEFAULT_DATA_FORMAT)
                    .to_string(),
                columns: metadata_columns(metadata),
                rows: Vec::new(),
            },
            ArtifactKind::Message => ArtifactBody::Message {
                content: String::new(),
            },
        };

        Self {
            id,
            title: metadata_str(metadata, "title").map(str::to_string),
            streaming: true,
            body,
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.body.kind()
    }
}

impl ArtifactBody {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactBody::Code { .. } => ArtifactKind::Code,
            ArtifactBody::Data { .. } => ArtifactKind::Data,
            ArtifactBody::Message { .. } => ArtifactKind::Message,
        }
    }
}

fn metadata_str<'a>(metadata: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn metadata_columns(metadata: &Map<String, Value>) -> Vec<String> {
    let Some(Value::Array(columns)) = metadata.get("columns") else {
        return Vec::new();
    };

    columns
        .iter()
        .map(|column| match column {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_code_start_defaults_language_to_plaintext() {
        let artifact = Artifact::from_start("c1".into(), ArtifactKind::Code, &Map::new());
        assert_eq!(
            artifact.body,
            ArtifactBody::Code {
                language: "plaintext".to_string(),
                content: String::new(),
            }
        );
        assert!(artifact.streaming);
        assert_eq!(artifact.title, None);
    }

    #[test]
    fn test_data_start_reads_columns_title_and_format() {
        let artifact = Artifact::from_start(
            "d1".into(),
            ArtifactKind::Data,
            &metadata(json!({
                "title": "Quarterly Sales Report",
                "format": "json_table_rows",
                "columns": ["Month", "Revenue", 3]
            })),
        );

        assert_eq!(artifact.title.as_deref(), Some("Quarterly Sales Report"));
        assert_eq!(
            artifact.body,
            ArtifactBody::Data {
                format: "json_table_rows".to_string(),
                columns: vec!["Month".into(), "Revenue".into(), "3".into()],
                rows: Vec::new(),
            }
        );
    }

    #[test]
    fn test_data_start_without_columns_is_empty_table() {
        let artifact = Artifact::from_start(
            "d2".into(),
            ArtifactKind::Data,
            &metadata(json!({ "columns": "not-a-list" })),
        );
        assert!(matches!(
            artifact.body,
            ArtifactBody::Data { ref columns, .. } if columns.is_empty()
        ));
    }

    #[test]
    fn test_artifact_serializes_with_type_tag() {
        let artifact = Artifact {
            id: "m1".into(),
            title: None,
            streaming: false,
            body: ArtifactBody::Message {
                content: "hi".into(),
            },
        };
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(
            json,
            json!({"id": "m1", "streaming": false, "type": "message", "content": "hi"})
        );
    }
}
