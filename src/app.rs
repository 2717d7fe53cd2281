use crate::config::Config;
use crate::runtime::context::RuntimeContext;
use crate::runtime::frontend::{ScrollAction, ScrollTarget, UserInputEvent};
use crate::runtime::mode::RuntimeMode;
use crate::runtime::r#loop::Runtime;
use crate::state::ChatStore;
use crate::transport::build_event_source;
use crate::types::ServerEvent;
use crate::ui::render::{artifact_line_count, transcript_lines, visual_row_count};
use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Page step used when the frontend does not know the viewport height.
pub const DEFAULT_PAGE_ROWS: usize = 10;

/// Interactive chat mode: scroll positions for both panes and the quit flag.
/// The transcript offset counts rows up from the newest entry, so zero keeps
/// following new output. The artifact offset counts rows down from the top.
#[derive(Debug, Default)]
pub struct ChatMode {
    transcript_from_bottom: usize,
    artifact_scroll: usize,
    quit_requested: bool,
}

impl ChatMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript_from_bottom(&self) -> usize {
        self.transcript_from_bottom
    }

    pub fn artifact_scroll(&self) -> usize {
        self.artifact_scroll
    }

    fn scroll_transcript(&mut self, action: ScrollAction, store: &ChatStore) {
        // Unwrapped rows bound the offset; the renderer clamps to the viewport.
        let max = visual_row_count(&transcript_lines(store.messages()), usize::MAX);
        self.transcript_from_bottom = match action {
            ScrollAction::LineUp => self.transcript_from_bottom.saturating_add(1),
            ScrollAction::LineDown => self.transcript_from_bottom.saturating_sub(1),
            ScrollAction::PageUp(step) => self.transcript_from_bottom.saturating_add(step.max(1)),
            ScrollAction::PageDown(step) => {
                self.transcript_from_bottom.saturating_sub(step.max(1))
            }
            ScrollAction::Home => max,
            ScrollAction::End => 0,
        }
        .min(max);
    }

    fn scroll_artifact(&mut self, action: ScrollAction, store: &ChatStore) {
        let Some(artifact) = store.active_artifact() else {
            return;
        };
        let max = artifact_line_count(artifact);
        self.artifact_scroll = match action {
            ScrollAction::LineUp => self.artifact_scroll.saturating_sub(1),
            ScrollAction::LineDown => self.artifact_scroll.saturating_add(1),
            ScrollAction::PageUp(step) => self.artifact_scroll.saturating_sub(step.max(1)),
            ScrollAction::PageDown(step) => self.artifact_scroll.saturating_add(step.max(1)),
            ScrollAction::Home => 0,
            ScrollAction::End => max,
        }
        .min(max);
    }
}

impl RuntimeMode for ChatMode {
    fn on_user_input(&mut self, input: String, ctx: &mut RuntimeContext) {
        if ctx.submit(&input).is_some() {
            self.transcript_from_bottom = 0;
        }
    }

    fn on_server_event(&mut self, event: ServerEvent, ctx: &mut RuntimeContext) {
        if matches!(event, ServerEvent::ArtifactStart { .. }) {
            self.artifact_scroll = 0;
        }
        ctx.apply(event);
    }

    fn on_interrupt(&mut self, _ctx: &mut RuntimeContext) {
        info!("quit requested");
        self.quit_requested = true;
    }

    fn on_frontend_event(&mut self, event: UserInputEvent, ctx: &mut RuntimeContext) {
        match event {
            UserInputEvent::Text(text) => self.on_user_input(text, ctx),
            UserInputEvent::CloseArtifact => ctx.close_artifact(),
            UserInputEvent::ClearLog => {
                ctx.clear_log();
                self.transcript_from_bottom = 0;
            }
            UserInputEvent::Interrupt => self.on_interrupt(ctx),
            UserInputEvent::Scroll { target, action } => match target {
                ScrollTarget::Transcript => self.scroll_transcript(action, ctx.store()),
                ScrollTarget::Artifact => self.scroll_artifact(action, ctx.store()),
            },
        }
    }

    fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

/// One-line summary of the store for the header row.
pub fn status_line(store: &ChatStore) -> String {
    let link = if store.is_connected() {
        "connected"
    } else {
        "offline"
    };
    let artifact = match store.active_artifact() {
        None => "none",
        Some(artifact) if artifact.streaming => "streaming",
        Some(_) => "ready",
    };

    let mut line = format!(
        "link:{link} messages:{} artifact:{artifact}",
        store.messages().len()
    );
    if store.dropped_events() > 0 {
        line.push_str(&format!(" dropped:{}", store.dropped_events()));
    }
    line
}

pub fn build_runtime(config: &Config) -> Result<(Runtime<ChatMode>, RuntimeContext)> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let cancel = CancellationToken::new();
    let transport = build_event_source(config, event_tx, cancel.clone())?;
    info!(
        remote = config.uses_remote_server(),
        streaming = config.streaming,
        "chat runtime ready"
    );

    let ctx = RuntimeContext::new(transport, cancel);
    let runtime = Runtime::new(ChatMode::new(), event_rx);
    Ok((runtime, ctx))
}
