pub mod context;
pub mod frontend;
pub mod r#loop;
pub mod mode;

#[cfg(test)]
mod tests {
    #[test]
    fn test_runtime_types_compile() {
        use crate::runtime::{
            context::RuntimeContext,
            frontend::{FrontendAdapter, UserInputEvent},
            mode::RuntimeMode,
        };
        use crate::state::ChatStore;
        use crate::types::ServerEvent;

        fn _uses_runtime_mode_trait<T: RuntimeMode>() {}
        fn _uses_frontend_adapter_trait<M: RuntimeMode, T: FrontendAdapter<M>>() {}

        struct DummyMode;
        impl RuntimeMode for DummyMode {
            fn on_user_input(&mut self, _input: String, _ctx: &mut RuntimeContext) {}
            fn on_server_event(&mut self, _event: ServerEvent, _ctx: &mut RuntimeContext) {}
            fn on_frontend_event(&mut self, _event: UserInputEvent, _ctx: &mut RuntimeContext) {}
            fn quit_requested(&self) -> bool {
                true
            }
        }

        struct DummyFrontend;
        impl FrontendAdapter<DummyMode> for DummyFrontend {
            fn poll_user_input(&mut self, _mode: &DummyMode) -> Option<UserInputEvent> {
                None
            }
            fn render(&mut self, _mode: &DummyMode, _store: &ChatStore) {}
            fn should_quit(&self) -> bool {
                true
            }
        }

        let _ = std::mem::size_of::<Option<RuntimeContext>>();
        let _ = _uses_runtime_mode_trait::<DummyMode>;
        let _ = _uses_frontend_adapter_trait::<DummyMode, DummyFrontend>;
    }
}
