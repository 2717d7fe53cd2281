use crate::transport::EventReceiver;
use std::time::Duration;

use super::{context::RuntimeContext, frontend::FrontendAdapter, mode::RuntimeMode};

const TICK_INTERVAL: Duration = Duration::from_millis(33);

pub struct Runtime<M: RuntimeMode> {
    pub mode: M,
    event_rx: EventReceiver,
}

impl<M: RuntimeMode> Runtime<M> {
    pub fn new(mode: M, event_rx: EventReceiver) -> Self {
        Self { mode, event_rx }
    }

    /// Apply every event already queued by the transport. Returns how many
    /// were applied.
    pub fn drain_events(&mut self, ctx: &mut RuntimeContext) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.mode.on_server_event(event, ctx);
            applied += 1;
        }
        applied
    }

    pub async fn run<F: FrontendAdapter<M>>(&mut self, frontend: &mut F, ctx: &mut RuntimeContext) {
        ctx.connect();
        let mut tick = tokio::time::interval(TICK_INTERVAL);

        loop {
            frontend.render(&self.mode, ctx.store());

            if let Some(event) = frontend.poll_user_input(&self.mode) {
                self.mode.on_frontend_event(event, ctx);
            }
            self.drain_events(ctx);

            if frontend.should_quit() || self.mode.quit_requested() {
                break;
            }

            tokio::select! {
                _ = tick.tick() => {}
                Some(event) = self.event_rx.recv() => {
                    self.mode.on_server_event(event, ctx);
                }
            }
        }

        ctx.shutdown();
    }
}
