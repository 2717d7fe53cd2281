use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use discovery_chat::app::{build_runtime, status_line, ChatMode, DEFAULT_PAGE_ROWS};
use discovery_chat::config::Config;
use discovery_chat::logging;
use discovery_chat::runtime::frontend::{
    FrontendAdapter, ScrollAction, ScrollTarget, UserInputEvent,
};
use discovery_chat::state::ChatStore;
use discovery_chat::terminal::TerminalSession;
use discovery_chat::ui::editor::InputBuffer;
use discovery_chat::ui::layout::split_chat_layout;
use discovery_chat::ui::render::{
    input_visual_rows, render_artifact, render_input, render_status_line, render_transcript,
};
use ratatui::widgets::Clear;
use std::time::Duration;
use tracing::{error, info};

const MAX_INPUT_ROWS: usize = 6;

struct CrosstermFrontend {
    session: TerminalSession,
    input: InputBuffer,
    quit: bool,
}

impl CrosstermFrontend {
    fn new() -> Result<Self> {
        Ok(Self {
            session: TerminalSession::start()?,
            input: InputBuffer::new(),
            quit: false,
        })
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UserInputEvent> {
        map_key(key).or_else(|| {
            self.edit(key);
            None
        })
    }

    fn edit(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {}
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Char(ch)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.input.insert_str(&ch.to_string());
            }
            _ => {}
        }
    }
}

fn scroll(target: ScrollTarget, action: ScrollAction) -> Option<UserInputEvent> {
    Some(UserInputEvent::Scroll { target, action })
}

/// Keys with a meaning beyond editing the input line. Alt moves the artifact
/// panel instead of the transcript.
fn map_key(key: KeyEvent) -> Option<UserInputEvent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let target = if key.modifiers.contains(KeyModifiers::ALT) {
        ScrollTarget::Artifact
    } else {
        ScrollTarget::Transcript
    };

    match key.code {
        KeyCode::Char('c') if ctrl => Some(UserInputEvent::Interrupt),
        KeyCode::Char('l') if ctrl => Some(UserInputEvent::ClearLog),
        KeyCode::Esc => Some(UserInputEvent::CloseArtifact),
        KeyCode::Up => scroll(target, ScrollAction::LineUp),
        KeyCode::Down => scroll(target, ScrollAction::LineDown),
        KeyCode::PageUp => scroll(target, ScrollAction::PageUp(DEFAULT_PAGE_ROWS)),
        KeyCode::PageDown => scroll(target, ScrollAction::PageDown(DEFAULT_PAGE_ROWS)),
        KeyCode::Home if ctrl => scroll(target, ScrollAction::Home),
        KeyCode::End if ctrl => scroll(target, ScrollAction::End),
        _ => None,
    }
}

impl FrontendAdapter<ChatMode> for CrosstermFrontend {
    fn poll_user_input(&mut self, _mode: &ChatMode) -> Option<UserInputEvent> {
        let Ok(has_event) = event::poll(Duration::from_millis(16)) else {
            self.quit = true;
            return None;
        };
        if !has_event {
            return None;
        }

        let Ok(ev) = event::read() else {
            self.quit = true;
            return None;
        };

        match ev {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if key.code == KeyCode::Enter {
                    return self.input.submit().map(UserInputEvent::Text);
                }
                self.handle_key(key)
            }
            Event::Paste(text) => {
                self.input.insert_str(&text.replace(['\r', '\n'], " "));
                None
            }
            _ => None,
        }
    }

    fn render(&mut self, mode: &ChatMode, store: &ChatStore) {
        let status = status_line(store);
        let input = self.input.text();
        let cursor = self.input.cursor();
        let artifact = store
            .active_artifact()
            .filter(|_| store.is_artifact_visible());

        let drawn = self.session.terminal().draw(|frame| {
            let area = frame.area();
            frame.render_widget(Clear, area);
            let input_width = area.width.saturating_sub(2).max(1) as usize;
            let input_rows = input_visual_rows(input, input_width).min(MAX_INPUT_ROWS) as u16;
            let panes = split_chat_layout(area, input_rows, artifact.is_some());

            render_status_line(frame, panes.header, &status);
            render_transcript(
                frame,
                panes.transcript,
                store.messages(),
                mode.transcript_from_bottom(),
            );
            if let (Some(area), Some(artifact)) = (panes.artifact, artifact) {
                render_artifact(frame, area, artifact, mode.artifact_scroll());
            }
            render_input(frame, panes.input, input, cursor);
        });
        if let Err(error) = drawn {
            error!(%error, "terminal draw failed");
            self.quit = true;
        }
    }

    fn should_quit(&self) -> bool {
        self.quit
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;
    logging::init(&config)?;
    info!(log_path = %config.log_path.display(), "starting dchat");

    let (mut runtime, mut ctx) = build_runtime(&config)?;
    let mut frontend = CrosstermFrontend::new()?;
    runtime.run(&mut frontend, &mut ctx).await;
    info!("dchat exited");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_control_keys_map_to_actions() {
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(UserInputEvent::Interrupt)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Some(UserInputEvent::ClearLog)
        );
        assert_eq!(
            map_key(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(UserInputEvent::CloseArtifact)
        );
        assert_eq!(map_key(key(KeyCode::Char('l'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_alt_scrolls_artifact_panel() {
        assert_eq!(
            map_key(key(KeyCode::PageDown, KeyModifiers::NONE)),
            Some(UserInputEvent::Scroll {
                target: ScrollTarget::Transcript,
                action: ScrollAction::PageDown(DEFAULT_PAGE_ROWS),
            })
        );
        assert_eq!(
            map_key(key(KeyCode::Down, KeyModifiers::ALT)),
            Some(UserInputEvent::Scroll {
                target: ScrollTarget::Artifact,
                action: ScrollAction::LineDown,
            })
        );
        assert_eq!(map_key(key(KeyCode::Home, KeyModifiers::NONE)), None);
    }
}
