//! InnerTube live-chat client
//!
//! HTTP implementation of the chat provider: bootstraps a session from
//! the public watch page, then polls `live_chat/get_live_chat` with the
//! continuation token returned by each response.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::USER_AGENT;
use tracing::{debug, error, info, instrument};

use crate::{
    config::Config,
    error::{EndReason, RelayError, RelayResult},
    provider::models::{GetLiveChatRequest, GetLiveChatResponse, InnertubeClient, InnertubeContext},
    provider::{ChatBatch, ChatFeed, ChatSource, PollOutcome},
};

const CLIENT_NAME: &str = "WEB";

static API_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).unwrap());
static CLIENT_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""INNERTUBE_CONTEXT_CLIENT_VERSION"\s*:\s*"([^"]+)""#).unwrap());
// The live chat continuation sits inside the conversation bar's
// liveChatRenderer; matching from that anchor avoids the unrelated
// continuation tokens elsewhere on the page.
static CHAT_CONTINUATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""liveChatRenderer"\s*:\s*\{"continuations"\s*:\s*\[\{"reloadContinuationData"\s*:\s*\{"continuation"\s*:\s*"([^"]+)""#)
        .unwrap()
});

/// Session parameters scraped from the watch page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    pub api_key: String,
    pub client_version: String,
    /// Absent when the page has no live chat (ended or chat-disabled
    /// stream); the session then ends as `NoContent`.
    pub continuation: Option<String>,
}

/// Extract session parameters from watch-page HTML
pub fn parse_watch_page(html: &str) -> RelayResult<Bootstrap> {
    let api_key = API_KEY_RE
        .captures(html)
        .map(|captures| captures[1].to_string())
        .ok_or_else(|| RelayError::Provider("watch page missing InnerTube api key".to_string()))?;
    let client_version = CLIENT_VERSION_RE
        .captures(html)
        .map(|captures| captures[1].to_string())
        .ok_or_else(|| {
            RelayError::Provider("watch page missing InnerTube client version".to_string())
        })?;
    let continuation = CHAT_CONTINUATION_RE
        .captures(html)
        .map(|captures| captures[1].to_string());

    Ok(Bootstrap {
        api_key,
        client_version,
        continuation,
    })
}

/// Factory for InnerTube chat sessions
pub struct InnertubeSource {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl InnertubeSource {
    /// Create a new source from the shared HTTP client and configuration
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

#[async_trait]
impl ChatSource for InnertubeSource {
    /// Fetch the watch page and bootstrap a chat session from it
    #[instrument(skip(self), fields(video_id = %video_id))]
    async fn open(&self, video_id: &str) -> RelayResult<Box<dyn ChatFeed>> {
        let url = format!("{}/watch?v={}", self.base_url, video_id);

        debug!(url = %url, "Fetching watch page");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Watch page response status");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, "Watch page request failed");
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                message: format!("watch page for {video_id}"),
            });
        }

        let html = response.text().await?;
        let bootstrap = parse_watch_page(&html)?;

        if bootstrap.continuation.is_none() {
            info!(video_id = %video_id, "Watch page has no live chat");
        }

        Ok(Box::new(InnertubeChat {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            video_id: video_id.to_string(),
            api_key: bootstrap.api_key,
            client_version: bootstrap.client_version,
            continuation: bootstrap.continuation,
            ended: EndReason::NoContent,
        }))
    }
}

/// An open InnerTube chat session
///
/// Alive while a continuation token is held; once the provider stops
/// returning one, the session reports its end reason from every poll.
#[derive(Debug)]
pub struct InnertubeChat {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    video_id: String,
    api_key: String,
    client_version: String,
    continuation: Option<String>,
    ended: EndReason,
}

#[async_trait]
impl ChatFeed for InnertubeChat {
    fn is_alive(&self) -> bool {
        self.continuation.is_some()
    }

    #[instrument(skip(self), fields(video_id = %self.video_id))]
    async fn poll(&mut self) -> RelayResult<PollOutcome> {
        let Some(continuation) = self.continuation.take() else {
            return Ok(PollOutcome::Finished(self.ended));
        };

        let url = format!(
            "{}/youtubei/v1/live_chat/get_live_chat?key={}&prettyPrint=false",
            self.base_url, self.api_key
        );
        let request = GetLiveChatRequest {
            context: InnertubeContext {
                client: InnertubeClient {
                    client_name: CLIENT_NAME.to_string(),
                    client_version: self.client_version.clone(),
                },
            },
            continuation,
        };

        debug!(url = %url, "Polling live chat");

        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, &self.user_agent)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Live chat response status");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, "Live chat request failed");
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.text().await?;
        let parsed: GetLiveChatResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(error = %e, body = %body, "Failed to parse live chat response");
                return Err(RelayError::Json(e));
            }
        };

        let Some(contents) = parsed.continuation_contents else {
            // The chat closed; the stream is over.
            self.ended = EndReason::Finished;
            return Ok(PollOutcome::Finished(self.ended));
        };
        let page = contents.live_chat_continuation;

        match page.next_continuation() {
            Some(token) => self.continuation = Some(token.to_string()),
            None => self.ended = EndReason::Finished,
        }

        let batch: ChatBatch = page
            .actions
            .into_iter()
            .filter_map(|action| action.add_chat_item_action)
            .filter_map(|action| action.item.into_message())
            .collect();

        debug!(
            messages = batch.len(),
            alive = self.is_alive(),
            "Live chat poll complete"
        );
        Ok(PollOutcome::Continuing(batch))
    }
}
