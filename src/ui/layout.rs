use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChatLayout {
    pub header: Rect,
    pub transcript: Rect,
    pub artifact: Option<Rect>,
    pub input: Rect,
}

/// Status row on top, input rows at the bottom, and the transcript in
/// between. A visible artifact takes the right part of the middle band.
pub fn split_chat_layout(area: Rect, input_rows: u16, show_artifact: bool) -> ChatLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(input_rows.max(1)),
        ])
        .split(area);

    let (transcript, artifact) = if show_artifact {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        (columns[0], Some(columns[1]))
    } else {
        (rows[1], None)
    };

    ChatLayout {
        header: rows[0],
        transcript,
        artifact,
        input: rows[2],
    }
}
