use crate::state::{Artifact, ArtifactBody, Message};
use crate::types::{ArtifactKind, Sender};
use crate::ui::input_metrics::{
    char_display_width, cursor_row_col, truncate_to_display_width, wrap_input_lines,
};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};
use serde_json::Value;

const STREAMING_CURSOR: &str = "▌";

pub fn input_visual_rows(input: &str, width: usize) -> usize {
    wrap_input_lines(input, width).len().max(1)
}

pub fn render_input(frame: &mut Frame<'_>, area: Rect, input: &str, cursor_byte: usize) {
    if area.height == 0 || area.width <= 2 {
        return;
    }

    let input_width = area.width.saturating_sub(2).max(1) as usize;
    let lines = wrap_input_lines(input, input_width);
    let (cursor_row, cursor_col) = cursor_row_col(input, cursor_byte, input_width);
    let visible_rows = area.height as usize;
    let window_start = cursor_row.saturating_add(1).saturating_sub(visible_rows);

    let rendered: Vec<Line> = (window_start..window_start + visible_rows)
        .map(|row_index| {
            let prefix = if row_index == 0 { "> " } else { "  " };
            let line = lines.get(row_index).map(String::as_str).unwrap_or_default();
            Line::from(format!("{prefix}{line}"))
        })
        .collect();

    frame.render_widget(
        Paragraph::new(rendered).style(Style::default().fg(Color::Gray).bg(Color::Rgb(24, 24, 24))),
        area,
    );

    let cursor_y = area
        .y
        .saturating_add(cursor_row.saturating_sub(window_start) as u16);
    let cursor_x = area
        .x
        .saturating_add(2 + cursor_col as u16)
        .min(area.x.saturating_add(area.width.saturating_sub(1)));
    frame.set_cursor_position((cursor_x, cursor_y));
}

fn sender_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::Cyan),
        Sender::Assistant => Style::default().fg(Color::White),
        Sender::AssistantError => Style::default().fg(Color::Red),
    }
}

/// Transcript as styled lines. Error entries carry their own "Error:" text,
/// so they get no label.
pub fn transcript_lines(messages: &[Message]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in messages {
        let style = sender_style(message.sender);
        let prefix = match message.sender {
            Sender::AssistantError => String::new(),
            sender => format!("{}: ", sender.label()),
        };
        let indent = " ".repeat(prefix.len());

        let mut text = message.text.clone();
        if message.streaming {
            text.push_str(STREAMING_CURSOR);
        }
        for (index, row) in text.split('\n').enumerate() {
            let lead = if index == 0 {
                prefix.clone()
            } else {
                indent.clone()
            };
            lines.push(Line::from(vec![
                Span::styled(lead, style.add_modifier(Modifier::BOLD)),
                Span::styled(row.to_string(), style),
            ]));
        }
        lines.push(Line::default());
    }
    lines
}

/// Rows the lines occupy once soft-wrapped to `width`.
pub fn visual_row_count(lines: &[Line<'_>], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

/// `from_bottom` counts rows scrolled up from the newest entry; zero follows
/// the tail.
pub fn render_transcript(frame: &mut Frame<'_>, area: Rect, messages: &[Message], from_bottom: usize) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let lines = transcript_lines(messages);
    let total = visual_row_count(&lines, area.width as usize);
    let top = total
        .saturating_sub(area.height as usize)
        .saturating_sub(from_bottom);

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((clamp_u16(top), 0)),
        area,
    );
}

fn kind_label(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Code => "code",
        ArtifactKind::Data => "data",
        ArtifactKind::Message => "message",
    }
}

pub fn artifact_title(artifact: &Artifact) -> String {
    let name = artifact
        .title
        .clone()
        .unwrap_or_else(|| kind_label(artifact.kind()).to_string());
    let detail = match &artifact.body {
        ArtifactBody::Code { language, .. } => format!(" [{language}]"),
        ArtifactBody::Data { format, .. } => format!(" [{format}]"),
        ArtifactBody::Message { .. } => String::new(),
    };
    let state = if artifact.streaming { " (streaming)" } else { "" };
    format!(" {name}{detail}{state} ")
}

/// Scrollable rows of the artifact body: text lines, or table rows.
pub fn artifact_line_count(artifact: &Artifact) -> usize {
    match &artifact.body {
        ArtifactBody::Code { content, .. } | ArtifactBody::Message { content } => {
            content.lines().count()
        }
        ArtifactBody::Data { rows, .. } => rows.len(),
    }
}

/// Table cell text: strings unquoted, everything else as JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn render_artifact(frame: &mut Frame<'_>, area: Rect, artifact: &Artifact, scroll: usize) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(artifact_title(artifact))
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &artifact.body {
        ArtifactBody::Code { content, .. } => {
            let top = scroll.min(content.lines().count().saturating_sub(inner.height as usize));
            frame.render_widget(
                Paragraph::new(content.as_str())
                    .style(Style::default().fg(Color::Green))
                    .scroll((clamp_u16(top), 0)),
                inner,
            );
        }
        ArtifactBody::Message { content } => {
            frame.render_widget(
                Paragraph::new(content.as_str())
                    .wrap(Wrap { trim: false })
                    .scroll((clamp_u16(scroll), 0)),
                inner,
            );
        }
        ArtifactBody::Data { columns, rows, .. } => {
            render_data_table(frame, inner, columns, rows, scroll);
        }
    }
}

fn render_data_table(
    frame: &mut Frame<'_>,
    area: Rect,
    columns: &[String],
    rows: &[Vec<Value>],
    scroll: usize,
) {
    let column_count = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(columns.len()))
        .max()
        .unwrap_or(0)
        .max(1);
    let body_rows = (area.height as usize).saturating_sub(usize::from(!columns.is_empty()));
    let top = scroll.min(rows.len().saturating_sub(body_rows));

    let table_rows: Vec<Row> = rows
        .iter()
        .skip(top)
        .map(|row| Row::new(row.iter().map(cell_text)))
        .collect();
    let widths = vec![Constraint::Fill(1); column_count];

    let mut table = Table::new(table_rows, widths).column_spacing(1);
    if !columns.is_empty() {
        table = table.header(
            Row::new(columns.iter().cloned())
                .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)),
        );
    }
    frame.render_widget(table, area);
}

pub fn render_status_line(frame: &mut Frame<'_>, area: Rect, status: &str) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let text = truncate_line(status, area.width as usize);
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn clamp_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn truncate_line(input: &str, width: usize) -> String {
    let width = width.max(1);
    let total: usize = input.chars().map(char_display_width).sum();
    if total <= width {
        return input.to_string();
    }
    if width < 4 {
        return truncate_to_display_width(input, width);
    }
    let mut out = truncate_to_display_width(input, width - 3);
    out.push_str("...");
    out
}
