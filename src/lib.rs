pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod resolver;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod transport;
pub mod types;
pub mod ui;
pub mod util;

#[cfg(test)]
mod test_support;
