use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::chat::{Chat, ChatMemberUpdated, User};
use super::media::{Poll, PollAnswer};
use super::message::Message;
use super::query::{
    CallbackQuery, ChosenInlineResult, InlineQuery, PreCheckoutQuery, ShippingQuery,
};
use crate::error::FilterError;

/// One inbound notification from the Bot API.
///
/// Exactly one category is populated per update; `kind` holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    /// Monotonically increasing, assigned by the remote side. Zero when
    /// the payload carried none.
    #[serde(default)]
    pub update_id: i64,
    #[serde(flatten)]
    pub kind: UpdateKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    Message(Message),
    EditedMessage(Message),
    ChannelPost(Message),
    EditedChannelPost(Message),
    InlineQuery(InlineQuery),
    ChosenInlineResult(ChosenInlineResult),
    CallbackQuery(CallbackQuery),
    ShippingQuery(ShippingQuery),
    PreCheckoutQuery(PreCheckoutQuery),
    Poll(Poll),
    PollAnswer(PollAnswer),
    MyChatMember(ChatMemberUpdated),
    ChatMember(ChatMemberUpdated),
}

/// Which field of an update is populated.
///
/// Names match the wire keys, so they can be used in `allowed_updates`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateCategory {
    Message,
    EditedMessage,
    ChannelPost,
    EditedChannelPost,
    InlineQuery,
    ChosenInlineResult,
    CallbackQuery,
    ShippingQuery,
    PreCheckoutQuery,
    Poll,
    PollAnswer,
    MyChatMember,
    ChatMember,
}

impl UpdateCategory {
    pub const ALL: [UpdateCategory; 13] = [
        UpdateCategory::Message,
        UpdateCategory::EditedMessage,
        UpdateCategory::ChannelPost,
        UpdateCategory::EditedChannelPost,
        UpdateCategory::InlineQuery,
        UpdateCategory::ChosenInlineResult,
        UpdateCategory::CallbackQuery,
        UpdateCategory::ShippingQuery,
        UpdateCategory::PreCheckoutQuery,
        UpdateCategory::Poll,
        UpdateCategory::PollAnswer,
        UpdateCategory::MyChatMember,
        UpdateCategory::ChatMember,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateCategory::Message => "message",
            UpdateCategory::EditedMessage => "edited_message",
            UpdateCategory::ChannelPost => "channel_post",
            UpdateCategory::EditedChannelPost => "edited_channel_post",
            UpdateCategory::InlineQuery => "inline_query",
            UpdateCategory::ChosenInlineResult => "chosen_inline_result",
            UpdateCategory::CallbackQuery => "callback_query",
            UpdateCategory::ShippingQuery => "shipping_query",
            UpdateCategory::PreCheckoutQuery => "pre_checkout_query",
            UpdateCategory::Poll => "poll",
            UpdateCategory::PollAnswer => "poll_answer",
            UpdateCategory::MyChatMember => "my_chat_member",
            UpdateCategory::ChatMember => "chat_member",
        }
    }
}

impl fmt::Display for UpdateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateCategory {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UpdateCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| FilterError::UnknownCategory(s.to_string()))
    }
}

impl Update {
    pub fn category(&self) -> UpdateCategory {
        match &self.kind {
            UpdateKind::Message(_) => UpdateCategory::Message,
            UpdateKind::EditedMessage(_) => UpdateCategory::EditedMessage,
            UpdateKind::ChannelPost(_) => UpdateCategory::ChannelPost,
            UpdateKind::EditedChannelPost(_) => UpdateCategory::EditedChannelPost,
            UpdateKind::InlineQuery(_) => UpdateCategory::InlineQuery,
            UpdateKind::ChosenInlineResult(_) => UpdateCategory::ChosenInlineResult,
            UpdateKind::CallbackQuery(_) => UpdateCategory::CallbackQuery,
            UpdateKind::ShippingQuery(_) => UpdateCategory::ShippingQuery,
            UpdateKind::PreCheckoutQuery(_) => UpdateCategory::PreCheckoutQuery,
            UpdateKind::Poll(_) => UpdateCategory::Poll,
            UpdateKind::PollAnswer(_) => UpdateCategory::PollAnswer,
            UpdateKind::MyChatMember(_) => UpdateCategory::MyChatMember,
            UpdateKind::ChatMember(_) => UpdateCategory::ChatMember,
        }
    }

    /// The message carried by any of the four message-like categories.
    pub fn message(&self) -> Option<&Message> {
        match &self.kind {
            UpdateKind::Message(msg)
            | UpdateKind::EditedMessage(msg)
            | UpdateKind::ChannelPost(msg)
            | UpdateKind::EditedChannelPost(msg) => Some(msg),
            _ => None,
        }
    }

    /// The user that caused the update, whatever its category.
    pub fn from_user(&self) -> Option<&User> {
        match &self.kind {
            UpdateKind::Message(msg)
            | UpdateKind::EditedMessage(msg)
            | UpdateKind::ChannelPost(msg)
            | UpdateKind::EditedChannelPost(msg) => msg.from_user.as_ref(),
            UpdateKind::InlineQuery(q) => Some(&q.from_user),
            UpdateKind::ChosenInlineResult(r) => Some(&r.from_user),
            UpdateKind::CallbackQuery(q) => Some(&q.from_user),
            UpdateKind::ShippingQuery(q) => Some(&q.from_user),
            UpdateKind::PreCheckoutQuery(q) => Some(&q.from_user),
            UpdateKind::PollAnswer(a) => Some(&a.user),
            UpdateKind::MyChatMember(m) | UpdateKind::ChatMember(m) => Some(&m.from_user),
            UpdateKind::Poll(_) => None,
        }
    }

    /// Sender user id, falling back to the sender chat for channel posts and
    /// anonymous admins.
    pub fn sender_id(&self) -> Option<i64> {
        self.from_user()
            .map(|u| u.id)
            .or_else(|| self.message().and_then(Message::sender_id))
    }

    /// The chat the update happened in, when there is one.
    pub fn chat(&self) -> Option<&Chat> {
        match &self.kind {
            UpdateKind::CallbackQuery(q) => q.message.as_deref().map(|m| &m.chat),
            UpdateKind::MyChatMember(m) | UpdateKind::ChatMember(m) => Some(&m.chat),
            _ => self.message().map(|m| &m.chat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_names_round_trip() {
        for category in UpdateCategory::ALL {
            assert_eq!(category.as_str().parse::<UpdateCategory>().unwrap(), category);
            assert_eq!(
                serde_json::to_value(category).unwrap(),
                json!(category.as_str())
            );
        }
        assert!("reaction".parse::<UpdateCategory>().is_err());
    }

    #[test]
    fn test_callback_query_update() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 10,
            "callback_query": {
                "id": "cb1",
                "from": {"id": 7, "is_bot": false, "first_name": "Bo"},
                "data": "yes",
                "message": {
                    "message_id": 2,
                    "date": 0,
                    "chat": {"id": -5, "type": "group"}
                }
            }
        }))
        .unwrap();

        assert_eq!(update.category(), UpdateCategory::CallbackQuery);
        assert_eq!(update.sender_id(), Some(7));
        assert_eq!(update.chat().map(|c| c.id), Some(-5));
        assert!(update.message().is_none());
    }

    #[test]
    fn test_channel_post_sender_is_chat() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 11,
            "channel_post": {
                "message_id": 9,
                "date": 0,
                "chat": {"id": -100, "type": "channel"},
                "sender_chat": {"id": -100, "type": "channel"},
                "text": "news"
            }
        }))
        .unwrap();

        assert_eq!(update.category(), UpdateCategory::ChannelPost);
        assert!(update.from_user().is_none());
        assert_eq!(update.sender_id(), Some(-100));
    }
}
