use unicode_width::UnicodeWidthChar;

enum RowStep {
    Break,
    Char(char),
}

/// Walk `input[..end]` the way the input pane lays it out and return the
/// column reached on the last row.
fn walk_rows(input: &str, width: usize, end: usize, mut visit: impl FnMut(RowStep)) -> usize {
    let width = width.max(1);
    let mut col = 0usize;
    for (idx, ch) in input.char_indices() {
        if idx >= end {
            break;
        }
        match ch {
            '\r' => {}
            '\n' => {
                visit(RowStep::Break);
                col = 0;
            }
            _ => {
                let ch_width = char_display_width(ch);
                if col + ch_width > width && col > 0 {
                    visit(RowStep::Break);
                    col = 0;
                }
                visit(RowStep::Char(ch));
                col += ch_width;
            }
        }
    }
    col
}

/// Soft-wrap the input buffer into rows at most `width` columns wide.
pub fn wrap_input_lines(input: &str, width: usize) -> Vec<String> {
    let mut rows = vec![String::new()];
    walk_rows(input, width, input.len(), |step| match step {
        RowStep::Break => rows.push(String::new()),
        RowStep::Char(ch) => {
            if let Some(row) = rows.last_mut() {
                row.push(ch);
            }
        }
    });
    rows
}

pub fn cursor_row_col(input: &str, cursor_byte: usize, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let end = clamp_to_char_boundary_left(input, cursor_byte);
    let mut row = 0usize;
    let col = walk_rows(input, width, end, |step| {
        if matches!(step, RowStep::Break) {
            row += 1;
        }
    });

    if col >= width {
        (row + 1, 0)
    } else {
        (row, col)
    }
}

pub fn truncate_to_display_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = char_display_width(ch);
        if used + ch_width > max_width && used > 0 {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

pub fn char_display_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

pub fn clamp_to_char_boundary_left(input: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(input.len());
    while cursor > 0 && !input.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}
