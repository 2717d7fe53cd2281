mod artifact;
mod connection;
mod state;
mod streaming;


pub use connection::CONNECT_ERROR_TEXT;
pub use state::{ChatState, ChatStore};
