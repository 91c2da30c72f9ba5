//! Scripted chat feed for testing
//!
//! Stands in for the InnerTube provider in tests: plays back a fixed
//! sequence of poll outcomes, so relay behavior can be exercised
//! without a network. Only available with the `test-utils` feature.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{EndReason, RelayError, RelayResult};
use crate::provider::{ChatBatch, ChatFeed, ChatSource, PollOutcome};

/// One scripted poll result
#[derive(Debug)]
pub enum Step {
    /// A batch of messages (possibly empty) with the chat still live
    Batch(ChatBatch),
    /// Expected end of stream
    End(EndReason),
    /// Provider failure
    Fail(String),
}

/// Source that hands out a single scripted feed
pub struct ScriptedSource {
    script: Mutex<Option<Script>>,
}

enum Script {
    Feed(Vec<Step>),
    FailOpen(String),
}

impl ScriptedSource {
    /// Source whose feed plays back `steps` in order
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(Some(Script::Feed(steps))),
        }
    }

    /// Source whose `open` fails with the given description
    pub fn failing_open(description: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(Some(Script::FailOpen(description.into()))),
        }
    }
}

#[async_trait]
impl ChatSource for ScriptedSource {
    async fn open(&self, _video_id: &str) -> RelayResult<Box<dyn ChatFeed>> {
        let script = self
            .script
            .lock()
            .unwrap()
            .take()
            .expect("scripted source opened twice");
        match script {
            Script::Feed(steps) => Ok(Box::new(ScriptedFeed::new(steps))),
            Script::FailOpen(description) => Err(RelayError::Provider(description)),
        }
    }
}

/// Feed that plays back its script, then reports a normal end
#[derive(Debug)]
pub struct ScriptedFeed {
    steps: VecDeque<Step>,
    ended: Option<EndReason>,
}

impl ScriptedFeed {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            ended: None,
        }
    }
}

#[async_trait]
impl ChatFeed for ScriptedFeed {
    fn is_alive(&self) -> bool {
        self.ended.is_none() && !self.steps.is_empty()
    }

    async fn poll(&mut self) -> RelayResult<PollOutcome> {
        if let Some(reason) = self.ended {
            return Ok(PollOutcome::Finished(reason));
        }
        match self.steps.pop_front() {
            Some(Step::Batch(batch)) => Ok(PollOutcome::Continuing(batch)),
            Some(Step::End(reason)) => {
                self.ended = Some(reason);
                Ok(PollOutcome::Finished(reason))
            }
            Some(Step::Fail(description)) => {
                self.ended = Some(EndReason::Finished);
                Err(RelayError::Provider(description))
            }
            None => {
                self.ended = Some(EndReason::Finished);
                Ok(PollOutcome::Finished(EndReason::Finished))
            }
        }
    }
}
