use super::context::RuntimeContext;
use super::frontend::UserInputEvent;
use crate::types::ServerEvent;

pub trait RuntimeMode {
    fn on_user_input(&mut self, input: String, ctx: &mut RuntimeContext);
    fn on_server_event(&mut self, event: ServerEvent, ctx: &mut RuntimeContext);
    fn on_interrupt(&mut self, _ctx: &mut RuntimeContext) {}
    fn on_frontend_event(&mut self, event: UserInputEvent, ctx: &mut RuntimeContext);
    fn quit_requested(&self) -> bool;
}
