pub mod client;
#[cfg(test)]
pub mod mock_client;
pub mod stream;

pub use client::{ApiClient, ByteStream, CHAT_STREAM_ROUTE};
pub use stream::EventStreamParser;
