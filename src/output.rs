//! Relay output protocol
//!
//! The stdout side of the relay: a line-oriented UTF-8 protocol with
//! three line forms (`JOIN <id>`, one JSON array per non-empty batch,
//! `LOST <description>`). Every line is flushed as it is written, so a
//! mid-stream failure never drops batch lines that were already
//! emitted.

use std::io::{self, Write};

use crate::error::RelayError;
use crate::provider::models::ChatMessage;

/// Writer for the relay's line protocol
///
/// Generic over the sink so tests can capture lines in a buffer while
/// production writes to a locked stdout handle.
pub struct ProtocolWriter<W: Write> {
    out: W,
}

impl<W: Write> ProtocolWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Session-start line, emitted exactly once
    pub fn join(&mut self, video_id: &str) -> io::Result<()> {
        writeln!(self.out, "JOIN {video_id}")?;
        self.out.flush()
    }

    /// One batch as a single JSON line
    pub fn batch(&mut self, batch: &[ChatMessage]) -> io::Result<()> {
        let json = serde_json::to_string(batch)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(self.out, "{json}")?;
        self.out.flush()
    }

    /// Abnormal-termination line, emitted at most once
    pub fn lost(&mut self, error: &RelayError) -> io::Result<()> {
        writeln!(self.out, "LOST {error}")?;
        self.out.flush()
    }

    /// Recover the sink (used by tests to inspect written lines)
    pub fn into_inner(self) -> W {
        self.out
    }
}
