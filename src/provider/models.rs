//! InnerTube live-chat data models
//!
//! Wire structures for the `live_chat/get_live_chat` endpoint and the
//! batch message schema written to the output stream. Only the fields
//! the relay needs are declared; everything else in the payload is
//! ignored during deserialization.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Request body for `live_chat/get_live_chat`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLiveChatRequest {
    pub context: InnertubeContext,
    pub continuation: String,
}

/// InnerTube request context
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InnertubeContext {
    pub client: InnertubeClient,
}

/// Client identification within the request context
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InnertubeClient {
    pub client_name: String,
    pub client_version: String,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Response from `live_chat/get_live_chat`
///
/// `continuation_contents` is absent once the chat has closed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLiveChatResponse {
    pub continuation_contents: Option<ContinuationContents>,
}

/// Container for the live chat continuation payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuationContents {
    pub live_chat_continuation: LiveChatContinuation,
}

/// One page of live chat data
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatContinuation {
    #[serde(default)]
    pub continuations: Vec<Continuation>,
    #[serde(default)]
    pub actions: Vec<ChatAction>,
}

impl LiveChatContinuation {
    /// Continuation token for the next poll, if the chat is still open
    pub fn next_continuation(&self) -> Option<&str> {
        self.continuations.iter().find_map(Continuation::token)
    }
}

/// Continuation entry; exactly one of the variants is populated
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Continuation {
    pub invalidation_continuation_data: Option<ContinuationData>,
    pub timed_continuation_data: Option<ContinuationData>,
    pub reload_continuation_data: Option<ContinuationData>,
}

impl Continuation {
    fn token(&self) -> Option<&str> {
        self.invalidation_continuation_data
            .as_ref()
            .or(self.timed_continuation_data.as_ref())
            .or(self.reload_continuation_data.as_ref())
            .map(|data| data.continuation.as_str())
    }
}

/// Token payload shared by the continuation variants
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuationData {
    pub continuation: String,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// A single chat action; non-message actions deserialize with all
/// fields `None` and are skipped
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAction {
    pub add_chat_item_action: Option<AddChatItemAction>,
}

/// Wrapper around the added chat item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChatItemAction {
    pub item: ChatItem,
}

/// Chat item renderers the relay recognizes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatItem {
    pub live_chat_text_message_renderer: Option<MessageRenderer>,
    pub live_chat_paid_message_renderer: Option<MessageRenderer>,
    pub live_chat_paid_sticker_renderer: Option<MessageRenderer>,
    pub live_chat_membership_item_renderer: Option<MessageRenderer>,
}

impl ChatItem {
    /// Convert a recognized renderer into a batch message
    ///
    /// Returns `None` for renderer kinds the relay does not forward
    /// (placeholders, mode changes, viewer engagement items).
    pub fn into_message(self) -> Option<ChatMessage> {
        let (kind, renderer) = if let Some(r) = self.live_chat_text_message_renderer {
            (MessageKind::TextMessage, r)
        } else if let Some(r) = self.live_chat_paid_message_renderer {
            (MessageKind::SuperChat, r)
        } else if let Some(r) = self.live_chat_paid_sticker_renderer {
            (MessageKind::SuperSticker, r)
        } else if let Some(r) = self.live_chat_membership_item_renderer {
            (MessageKind::NewMember, r)
        } else {
            return None;
        };
        Some(renderer.into_message(kind))
    }
}

/// Common shape of the message renderers
///
/// Text messages carry `message`; membership items carry
/// `header_subtext`; paid messages additionally carry
/// `purchase_amount_text`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRenderer {
    pub id: String,
    pub timestamp_usec: String,
    pub author_name: Option<SimpleText>,
    pub author_external_channel_id: Option<String>,
    #[serde(default)]
    pub author_badges: Vec<AuthorBadge>,
    pub message: Option<Runs>,
    pub header_subtext: Option<Runs>,
    pub purchase_amount_text: Option<SimpleText>,
}

impl MessageRenderer {
    fn into_message(self, kind: MessageKind) -> ChatMessage {
        let timestamp: i64 = self.timestamp_usec.parse().unwrap_or_default();
        let datetime = DateTime::from_timestamp_micros(timestamp)
            .unwrap_or_default()
            .to_rfc3339();

        let mut author = ChatAuthor {
            name: self.author_name.map(|text| text.simple_text).unwrap_or_default(),
            channel_id: self.author_external_channel_id.unwrap_or_default(),
            owner: false,
            moderator: false,
            member: false,
            verified: false,
        };
        for badge in &self.author_badges {
            let Some(renderer) = &badge.live_chat_author_badge_renderer else {
                continue;
            };
            match renderer.icon.as_ref().map(|icon| icon.icon_type.as_str()) {
                Some("OWNER") => author.owner = true,
                Some("MODERATOR") => author.moderator = true,
                Some("VERIFIED") => author.verified = true,
                _ => {}
            }
            // Membership badges have no icon type, only a custom image.
            if renderer.custom_thumbnail.is_some() {
                author.member = true;
            }
        }

        let text = self
            .message
            .or(self.header_subtext)
            .map(|runs| runs.to_text())
            .unwrap_or_default();

        ChatMessage {
            kind,
            id: self.id,
            message: text,
            timestamp,
            datetime,
            amount: self.purchase_amount_text.map(|text| text.simple_text),
            author,
        }
    }
}

/// `{"simpleText": "..."}` wrapper
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleText {
    pub simple_text: String,
}

/// Rich text as a sequence of text and emoji runs
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runs {
    #[serde(default)]
    pub runs: Vec<Run>,
}

impl Runs {
    /// Flatten runs into a single string, emojis in `:shortcode:` form
    pub fn to_text(&self) -> String {
        self.runs
            .iter()
            .map(|run| {
                if let Some(text) = &run.text {
                    text.clone()
                } else if let Some(emoji) = &run.emoji {
                    emoji
                        .shortcuts
                        .first()
                        .cloned()
                        .or_else(|| emoji.emoji_id.clone())
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .collect()
    }
}

/// One text or emoji run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub text: Option<String>,
    pub emoji: Option<Emoji>,
}

/// Emoji run payload
///
/// Unicode emojis carry the literal character as `emoji_id`; channel
/// emojis carry `:name:` shortcuts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emoji {
    pub emoji_id: Option<String>,
    #[serde(default)]
    pub shortcuts: Vec<String>,
}

/// Author badge entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorBadge {
    pub live_chat_author_badge_renderer: Option<BadgeRenderer>,
}

/// Badge payload: either a built-in icon or a member custom thumbnail
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRenderer {
    pub icon: Option<BadgeIcon>,
    pub custom_thumbnail: Option<serde_json::Value>,
}

/// Built-in badge icon
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeIcon {
    pub icon_type: String,
}

// ---------------------------------------------------------------------------
// Batch schema
// ---------------------------------------------------------------------------

/// Kind of a forwarded chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    TextMessage,
    SuperChat,
    SuperSticker,
    NewMember,
}

/// A single message as serialized into a batch line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub id: String,
    pub message: String,
    /// Microseconds since the Unix epoch, as reported by the provider
    pub timestamp: i64,
    /// RFC 3339 rendering of `timestamp`
    pub datetime: String,
    /// Display amount for paid messages (e.g. `"$5.00"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    pub author: ChatAuthor,
}

/// Message author and their chat-role flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatAuthor {
    pub name: String,
    pub channel_id: String,
    pub owner: bool,
    pub moderator: bool,
    pub member: bool,
    pub verified: bool,
}
