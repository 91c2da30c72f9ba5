//! chatrelay - streams a YouTube live chat to stdout as NDJSON
//!
//! This library provides the core functionality for the chatrelay
//! binary: a polling relay loop over a live-chat provider, writing a
//! line-oriented protocol (`JOIN`, batch JSON, `LOST`) to an output
//! sink.

pub mod config;
pub mod error;
pub mod output;
pub mod provider;
pub mod relay;

pub use crate::config::Config;
pub use crate::error::{EndReason, RelayError, RelayResult};
pub use crate::output::ProtocolWriter;
pub use crate::provider::{ChatBatch, ChatFeed, ChatSource, InnertubeSource, PollOutcome};
pub use crate::relay::{RelayOutcome, StreamSession};
