use super::super::artifact::{Artifact, ArtifactBody};
use super::ChatStore;
use crate::types::{ArtifactKind, ChunkData};
use serde_json::{Map, Value};
use tracing::{debug, warn};

impl ChatStore {
    /// Replace the artifact slot with a fresh, empty artifact and show the
    /// panel. Whatever was there before is discarded, finished or not.
    pub fn apply_artifact_start(
        &mut self,
        artifact_id: impl Into<String>,
        kind: ArtifactKind,
        metadata: &Map<String, Value>,
    ) {
        let artifact = Artifact::from_start(artifact_id.into(), kind, metadata);
        if let Some(previous) = &self.state.active_artifact {
            if previous.streaming {
                debug!(
                    abandoned = %previous.id,
                    replacement = %artifact.id,
                    "artifact replaced before it finished streaming"
                );
            }
        }
        self.state.active_artifact = Some(artifact);
        self.state.artifact_visible = true;
    }

    pub fn apply_artifact_chunk(&mut self, artifact_id: &str, chunk: ChunkData) {
        let Some(artifact) = self.matching_artifact_mut(artifact_id, "artifact_chunk") else {
            return;
        };

        let applied = match (&mut artifact.body, chunk) {
            (ArtifactBody::Code { content, .. }, ChunkData::Text(text))
            | (ArtifactBody::Message { content }, ChunkData::Text(text)) => {
                content.push_str(&text);
                true
            }
            (ArtifactBody::Data { rows, .. }, ChunkData::Row(row)) => {
                rows.push(row);
                true
            }
            (ArtifactBody::Data { .. }, ChunkData::Text(_))
            | (ArtifactBody::Code { .. }, ChunkData::Row(_))
            | (ArtifactBody::Message { .. }, ChunkData::Row(_)) => false,
        };

        if !applied {
            warn!(
                artifact_id,
                kind = ?artifact.kind(),
                "dropping artifact_chunk with a payload shape that does not fit the artifact"
            );
            self.record_drop();
        }
    }

    /// Mark the active artifact finished. Repeating it changes nothing.
    pub fn apply_artifact_end(&mut self, artifact_id: &str) {
        if let Some(artifact) = self.matching_artifact_mut(artifact_id, "artifact_end") {
            artifact.streaming = false;
        }
    }

    pub fn close_artifact(&mut self) {
        self.state.active_artifact = None;
        self.state.artifact_visible = false;
    }

    /// The active artifact if it carries `artifact_id`; otherwise logs and
    /// counts the event as dropped.
    fn matching_artifact_mut(&mut self, artifact_id: &str, event: &str) -> Option<&mut Artifact> {
        match self.state.active_artifact.as_ref() {
            Some(active) if active.id == artifact_id => {}
            Some(active) => {
                warn!(
                    event,
                    artifact_id,
                    active_id = %active.id,
                    "dropping event for an artifact that is no longer active"
                );
                self.record_drop();
                return None;
            }
            None => {
                warn!(event, artifact_id, "dropping event with no active artifact");
                self.record_drop();
                return None;
            }
        }

        self.state.active_artifact.as_mut()
    }
}
