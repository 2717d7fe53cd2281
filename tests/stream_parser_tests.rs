use discovery_chat::api::EventStreamParser;
use discovery_chat::types::{ArtifactKind, ChunkData, Sender, ServerEvent};
use serde_json::json;

#[test]
fn test_fragmented_frame_is_emitted_once_complete() {
    let mut parser = EventStreamParser::new();

    let events1 = parser.process(b"event: chat_chunk\ndata: {\"id\":\"m1\",\"te");
    assert!(events1.is_empty());

    let events2 =
        parser.process(b"xt\":\"Hel\",\"sender\":\"assistant\",\"is_first_chunk\":true}\n\n");
    assert_eq!(
        events2,
        vec![ServerEvent::ChatChunk {
            id: "m1".into(),
            text: "Hel".into(),
            sender: Sender::Assistant,
            is_first_chunk: true,
        }]
    );
}

#[test]
fn test_invalid_payload_is_skipped_without_losing_later_frames() {
    let mut parser = EventStreamParser::new();

    let events = parser.process(
        b"event: chat_end\ndata: {invalid json}\n\nevent: artifact_end\ndata: {\"artifact_id\":\"a1\"}\n\n",
    );
    assert_eq!(
        events,
        vec![ServerEvent::ArtifactEnd {
            artifact_id: "a1".into()
        }]
    );
}

#[test]
fn test_unknown_event_names_are_ignored() {
    let mut parser = EventStreamParser::new();
    let events = parser.process(b"event: typing\ndata: {\"who\":\"ai\"}\n\n");
    assert!(events.is_empty());
}

#[test]
fn test_missing_is_first_chunk_defaults_to_continuation() {
    let mut parser = EventStreamParser::new();
    let events =
        parser.process(b"event: chat_chunk\ndata: {\"id\":\"m1\",\"text\":\"lo\",\"sender\":\"ai\"}\n\n");
    assert_eq!(
        events,
        vec![ServerEvent::ChatChunk {
            id: "m1".into(),
            text: "lo".into(),
            sender: Sender::Assistant,
            is_first_chunk: false,
        }]
    );
}

#[test]
fn test_artifact_start_and_row_chunk_decode() {
    let mut parser = EventStreamParser::new();
    let events = parser.process(
        b"event: artifact_start\ndata: {\"artifact_id\":\"a1\",\"artifact_type\":\"data\",\"metadata\":{\"columns\":[\"Region\",\"Units\"]}}\n\n\
          event: artifact_chunk\ndata: {\"artifact_id\":\"a1\",\"chunk_data\":[\"North\",120]}\n\n",
    );
    assert_eq!(events.len(), 2);

    match &events[0] {
        ServerEvent::ArtifactStart {
            artifact_id,
            artifact_type,
            metadata,
        } => {
            assert_eq!(artifact_id, "a1");
            assert_eq!(*artifact_type, ArtifactKind::Data);
            assert_eq!(metadata.get("columns"), Some(&json!(["Region", "Units"])));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(
        events[1],
        ServerEvent::ArtifactChunk {
            artifact_id: "a1".into(),
            chunk_data: ChunkData::Row(vec![json!("North"), json!(120)]),
        }
    );
}

#[test]
fn test_encoded_frames_decode_back() {
    let event = ServerEvent::ChatEnd {
        id: "m9".into(),
        sender: Sender::AssistantError,
        full_response: "Error: boom".into(),
    };
    let mut parser = EventStreamParser::new();
    assert_eq!(parser.process(event.to_sse_frame().as_bytes()), vec![event]);
}
