use super::ChatStore;
use crate::types::ConnectionStatus;
use tracing::{info, warn};

pub const CONNECT_ERROR_TEXT: &str = "Error: Cannot connect to chat. Backend offline?";

impl ChatStore {
    /// Track transport connectivity. A connect error also lands in the
    /// transcript so the failure is visible.
    pub fn apply_connection(&mut self, status: ConnectionStatus) {
        if let Some(reason) = status.error {
            warn!(%reason, "chat transport failed to connect");
            self.state.connected = false;
            self.apply_local_error("connect-error", CONNECT_ERROR_TEXT);
            return;
        }

        if status.connected != self.state.connected {
            info!(connected = status.connected, "chat transport connection changed");
        }
        self.state.connected = status.connected;
    }
}
