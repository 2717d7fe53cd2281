//! Keyword-driven artifact generation used by the in-process transport.

mod catalog;
mod reply;

pub use catalog::{default_catalog, no_match_payload, CatalogEntry, NO_MATCH_TEXT};
pub use reply::ReplyComposer;

use crate::state::ArtifactBody;
use crate::types::{ChunkData, ServerEvent};
use aho_corasick::AhoCorasick;
use anyhow::Result;
use serde_json::{Map, Value};
use tracing::debug;

/// A complete artifact as the resolver produces it, before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPayload {
    pub title: Option<String>,
    pub body: ArtifactBody,
}

impl ArtifactPayload {
    /// Split the payload into `artifact_start`, one chunk per line (code),
    /// row (data) or word (message), and `artifact_end`.
    pub fn into_events(self, artifact_id: impl Into<String>) -> Vec<ServerEvent> {
        let artifact_id = artifact_id.into();
        let mut metadata = Map::new();
        if let Some(title) = self.title {
            metadata.insert("title".to_string(), Value::String(title));
        }

        let artifact_type = self.body.kind();
        let chunks: Vec<ChunkData> = match self.body {
            ArtifactBody::Code { language, content } => {
                metadata.insert("language".to_string(), Value::String(language));
                text_chunks(&content, '\n')
            }
            ArtifactBody::Data {
                format,
                columns,
                rows,
            } => {
                metadata.insert("format".to_string(), Value::String(format));
                metadata.insert(
                    "columns".to_string(),
                    Value::Array(columns.into_iter().map(Value::String).collect()),
                );
                rows.into_iter().map(ChunkData::Row).collect()
            }
            ArtifactBody::Message { content } => text_chunks(&content, ' '),
        };

        let mut events = Vec::with_capacity(chunks.len() + 2);
        events.push(ServerEvent::ArtifactStart {
            artifact_id: artifact_id.clone(),
            artifact_type,
            metadata,
        });
        events.extend(chunks.into_iter().map(|chunk_data| ServerEvent::ArtifactChunk {
            artifact_id: artifact_id.clone(),
            chunk_data,
        }));
        events.push(ServerEvent::ArtifactEnd { artifact_id });
        events
    }
}

fn text_chunks(content: &str, separator: char) -> Vec<ChunkData> {
    content
        .split_inclusive(separator)
        .map(|piece| ChunkData::Text(piece.to_string()))
        .collect()
}

/// Matches free text against the artifact catalog.
pub struct ArtifactResolver {
    entries: Vec<CatalogEntry>,
    matcher: AhoCorasick,
    /// Catalog index owning each matcher pattern.
    pattern_owner: Vec<usize>,
}

impl ArtifactResolver {
    pub fn new() -> Result<Self> {
        Self::with_catalog(default_catalog())
    }

    pub fn with_catalog(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut patterns = Vec::new();
        let mut pattern_owner = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            for keyword in entry.keywords {
                patterns.push(*keyword);
                pattern_owner.push(index);
            }
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(patterns)?;
        Ok(Self {
            entries,
            matcher,
            pattern_owner,
        })
    }

    /// The first catalog entry, in catalog order, with a keyword contained
    /// in `query`.
    pub fn find(&self, query: &str) -> Option<&CatalogEntry> {
        let index = self
            .matcher
            .find_overlapping_iter(query)
            .map(|found| self.pattern_owner[found.pattern().as_usize()])
            .min()?;
        let entry = self.entries.get(index)?;
        debug!(query, matched = entry.description, "artifact catalog match");
        Some(entry)
    }

    /// The matched payload, if any keyword hits.
    pub fn matching(&self, query: &str) -> Option<ArtifactPayload> {
        self.find(query).map(|entry| entry.payload.clone())
    }

    /// The matched payload, or the "no match" message payload.
    pub fn resolve(&self, query: &str) -> ArtifactPayload {
        self.matching(query).unwrap_or_else(no_match_payload)
    }

    /// [`resolve`](Self::resolve) delivered as a start/chunk/end sequence.
    pub fn stream(&self, query: &str, artifact_id: impl Into<String>) -> Vec<ServerEvent> {
        self.resolve(query).into_events(artifact_id)
    }
}
