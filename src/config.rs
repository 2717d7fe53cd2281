use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::util::{non_empty_env, parse_bool_flag};

pub const SERVER_URL_ENV: &str = "DCHAT_SERVER_URL";
pub const STREAMING_ENV: &str = "DCHAT_STREAMING";
pub const CHUNK_DELAY_ENV: &str = "DCHAT_CHUNK_DELAY_MS";
pub const LOG_PATH_ENV: &str = "DCHAT_LOG_PATH";

const DEFAULT_CHUNK_DELAY_MS: u64 = 50;
const MAX_CHUNK_DELAY_MS: u64 = 2000;
const DEFAULT_LOG_PATH: &str = "/tmp/dchat.log";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote chat server. `None` runs the resolver in-process.
    pub server_url: Option<String>,
    /// Deliver replies chunk by chunk instead of all at once.
    pub streaming: bool,
    pub chunk_delay: Duration,
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: None,
            streaming: true,
            chunk_delay: Duration::from_millis(DEFAULT_CHUNK_DELAY_MS),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let streaming = std::env::var(STREAMING_ENV)
            .ok()
            .and_then(parse_bool_flag)
            .unwrap_or(defaults.streaming);
        let chunk_delay = match non_empty_env(CHUNK_DELAY_ENV) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms.min(MAX_CHUNK_DELAY_MS)),
                Err(_) => bail!("Invalid {CHUNK_DELAY_ENV} '{raw}': expected milliseconds"),
            },
            None => defaults.chunk_delay,
        };

        Ok(Self {
            server_url: non_empty_env(SERVER_URL_ENV),
            streaming,
            chunk_delay,
            log_path: non_empty_env(LOG_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.server_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("Invalid {SERVER_URL_ENV} '{url}': expected http:// or https:// URL");
            }
        }

        if self.chunk_delay > Duration::from_millis(MAX_CHUNK_DELAY_MS) {
            bail!(
                "Chunk delay {}ms exceeds the {MAX_CHUNK_DELAY_MS}ms maximum",
                self.chunk_delay.as_millis()
            );
        }

        if self.log_path.as_os_str().is_empty() {
            bail!("Log path must not be empty");
        }

        Ok(())
    }

    pub fn uses_remote_server(&self) -> bool {
        self.server_url.is_some()
    }
}
