//! Configuration management for chatrelay
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// User agent sent with watch-page and API requests.
///
/// The watch page serves a reduced layout to unknown clients, so a
/// desktop browser string is required for the embedded chat config to
/// be present.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider origin serving the watch page and InnerTube endpoints
    pub base_url: String,

    /// Fixed delay between chat polls
    pub poll_interval: Duration,
    /// Timeout applied to each HTTP request
    pub request_timeout: Duration,

    /// User agent header value for provider requests
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: env::var("CHATRELAY_BASE_URL")
                .unwrap_or_else(|_| "https://www.youtube.com".to_string()),

            poll_interval: Duration::from_secs(
                env::var("CHATRELAY_POLL_INTERVAL_SECS")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .context("Invalid CHATRELAY_POLL_INTERVAL_SECS")?,
            ),
            request_timeout: Duration::from_secs(
                env::var("CHATRELAY_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid CHATRELAY_REQUEST_TIMEOUT_SECS")?,
            ),

            user_agent: env::var("CHATRELAY_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        })
    }
}
