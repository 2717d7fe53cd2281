use crate::types::{EventDecodeError, ServerEvent};
use tracing::{debug, warn};

/// Incremental decoder for the chat server's SSE body.
///
/// Frames are `event: <name>` plus one or more `data: <json>` lines,
/// terminated by a blank line. Bytes are buffered until a frame is complete,
/// so frames and UTF-8 sequences may be split across network chunks.
#[derive(Default)]
pub struct EventStreamParser {
    buffer: Vec<u8>,
}

impl EventStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, chunk: &[u8]) -> Vec<ServerEvent> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        let mut start = 0;

        while let Some((frame_end, next_start)) = find_frame_end(&self.buffer[start..]) {
            let frame = String::from_utf8_lossy(&self.buffer[start..start + frame_end]);
            if let Some(event) = decode_frame(&frame) {
                events.push(event);
            }
            start += next_start;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }

        events
    }

    /// Hand back whatever incomplete frame is still buffered.
    pub fn flush(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        rest
    }
}

/// Position of the blank line ending the first frame, and where the next
/// frame begins. Accepts both `\n\n` and `\r\n\r\n`.
fn find_frame_end(bytes: &[u8]) -> Option<(usize, usize)> {
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index..].starts_with(b"\n\n") {
            return Some((index, index + 2));
        }
        if bytes[index..].starts_with(b"\r\n\r\n") {
            return Some((index, index + 4));
        }
        index += 1;
    }
    None
}

fn decode_frame(frame: &str) -> Option<ServerEvent> {
    let mut event_name = None;
    let mut data_lines = Vec::new();

    for line in frame.lines() {
        let line = line.trim_end_matches('\r');
        if line.starts_with(':') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("event:") {
            event_name = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }

    let name = event_name?;
    if data_lines.is_empty() {
        debug!(event = %name, "skipping SSE frame without data");
        return None;
    }

    let data = data_lines.join("\n");
    match ServerEvent::decode(&name, &data) {
        Ok(event) => Some(event),
        Err(EventDecodeError::UnknownEvent(name)) => {
            debug!(event = %name, "skipping unknown SSE event");
            None
        }
        Err(error) => {
            warn!(%error, %data, "dropping undecodable SSE frame");
            None
        }
    }
}
