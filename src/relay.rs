//! Chat relay loop
//!
//! Drives one chat session from JOIN to completion, forwarding each
//! non-empty batch to the output stream as a single JSON line and
//! sleeping a fixed delay between polls.

use std::io::{self, Write};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::{EndReason, RelayError};
use crate::output::ProtocolWriter;
use crate::provider::{ChatSource, PollOutcome};

/// Terminal result of a relay session
#[derive(Debug)]
pub enum RelayOutcome {
    /// The stream ended in an expected way
    Completed(EndReason),
    /// The provider failed; a LOST line has been written
    Lost(RelayError),
}

impl RelayOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            RelayOutcome::Completed(_) => 0,
            RelayOutcome::Lost(_) => 1,
        }
    }
}

/// A relay session bound to one stream id
///
/// The session owns its chat source; there is no shared or global
/// client state.
pub struct StreamSession<S: ChatSource> {
    source: S,
    video_id: String,
    poll_interval: Duration,
}

impl<S: ChatSource> StreamSession<S> {
    pub fn new(source: S, video_id: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            source,
            video_id: video_id.into(),
            poll_interval,
        }
    }

    /// Run the relay to completion
    ///
    /// Emits `JOIN <id>` before the session is opened, so an open
    /// failure still produces `JOIN` followed by `LOST`. Provider
    /// failures are reported through the returned outcome; an `Err`
    /// here means the output sink itself failed.
    pub async fn run<W: Write>(self, out: &mut ProtocolWriter<W>) -> io::Result<RelayOutcome> {
        out.join(&self.video_id)?;

        let mut feed = match self.source.open(&self.video_id).await {
            Ok(feed) => feed,
            Err(e) => {
                error!(video_id = %self.video_id, error = %e, "Failed to open chat");
                out.lost(&e)?;
                return Ok(RelayOutcome::Lost(e));
            }
        };
        info!(video_id = %self.video_id, "Joined chat");

        loop {
            match feed.poll().await {
                Ok(PollOutcome::Continuing(batch)) => {
                    if !batch.is_empty() {
                        debug!(messages = batch.len(), "Forwarding batch");
                        out.batch(&batch)?;
                    }
                    tokio::time::sleep(self.poll_interval).await;
                }
                Ok(PollOutcome::Finished(reason)) => {
                    info!(video_id = %self.video_id, ?reason, "Chat ended");
                    return Ok(RelayOutcome::Completed(reason));
                }
                Err(e) => {
                    error!(video_id = %self.video_id, error = %e, "Chat lost");
                    out.lost(&e)?;
                    return Ok(RelayOutcome::Lost(e));
                }
            }
        }
    }
}
