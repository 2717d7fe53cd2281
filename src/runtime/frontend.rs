use super::mode::RuntimeMode;
use crate::state::ChatStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollTarget {
    Transcript,
    Artifact,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAction {
    LineUp,
    LineDown,
    PageUp(usize),
    PageDown(usize),
    Home,
    End,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserInputEvent {
    Text(String),
    CloseArtifact,
    ClearLog,
    Interrupt,
    Scroll {
        target: ScrollTarget,
        action: ScrollAction,
    },
}

pub trait FrontendAdapter<M: RuntimeMode> {
    fn poll_user_input(&mut self, mode: &M) -> Option<UserInputEvent>;
    fn render(&mut self, mode: &M, store: &ChatStore);
    fn should_quit(&self) -> bool;
}
