//! Chat provider abstraction
//!
//! Defines the trait seam between the relay loop and the live-chat data
//! source, plus the InnerTube-backed implementation used in production.
//! Errors are part of the poll return value rather than raised
//! out-of-band; the relay loop decides how termination is reported.

pub mod innertube;
pub mod models;

#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;

use async_trait::async_trait;

use crate::error::{EndReason, RelayResult};
use models::ChatMessage;

pub use innertube::InnertubeSource;

/// Messages retrieved by a single poll
pub type ChatBatch = Vec<ChatMessage>;

/// Result of a single successful poll against a live chat feed
#[derive(Debug)]
pub enum PollOutcome {
    /// The chat is still live; the batch may be empty
    Continuing(ChatBatch),
    /// The chat ended in an expected way
    Finished(EndReason),
}

/// A live chat session bound to one stream
///
/// Once a feed reports `Finished` (or is no longer alive), every
/// subsequent poll reports `Finished` with the same reason.
#[async_trait]
pub trait ChatFeed: Send + std::fmt::Debug {
    /// Whether another poll can make progress
    fn is_alive(&self) -> bool;

    /// Fetch the next batch of messages
    async fn poll(&mut self) -> RelayResult<PollOutcome>;
}

/// Factory for chat sessions
///
/// Implementations handle communication with a specific chat backend
/// while maintaining a consistent interface for the relay loop.
#[async_trait]
pub trait ChatSource: Send + Sync {
    /// Open a chat session for the given video id
    async fn open(&self, video_id: &str) -> RelayResult<Box<dyn ChatFeed>>;
}
