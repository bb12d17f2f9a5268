use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chat::{Chat, User};
use super::markup::InlineKeyboardMarkup;
use super::media::{
    Animation, Audio, Contact, Dice, Document, Location, PhotoSize, Poll, Sticker, Venue, Video,
    VideoNote, Voice,
};

/// A message, either received in an update or returned by a send call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique inside its chat.
    pub message_id: i64,
    /// Sender; absent for messages sent to channels.
    #[serde(rename = "from", skip_serializing_if = "Option::is_none")]
    pub from_user: Option<User>,
    /// Set when the message was sent on behalf of a chat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_chat: Option<Chat>,
    #[serde(default)]
    pub date: i64,
    pub chat: Chat,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_from: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_from_chat: Option<Chat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_from_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message: Option<Box<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_bot: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_signature: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<MessageEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Audio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Vec<PhotoSize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sticker: Option<Sticker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_note: Option<VideoNote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_entities: Option<Vec<MessageEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dice: Option<Dice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<Poll>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    // Service messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_chat_members: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_chat_member: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_chat_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_chat_photo: Option<Vec<PhotoSize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_chat_photo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_chat_created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supergroup_chat_created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_chat_created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_to_chat_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrate_from_chat_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_message: Option<Box<Message>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_website: Option<String>,

    /// Inline keyboard attached to the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl Message {
    /// Text of a text message, or the caption of a media message.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }

    /// Id of whoever sent the message: the user, or the chat it was sent on behalf of.
    pub fn sender_id(&self) -> Option<i64> {
        self.from_user
            .as_ref()
            .map(|u| u.id)
            .or_else(|| self.sender_chat.as_ref().map(|c| c.id))
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }

    /// Splits a `/command@bot args` text into `("command", "args")`.
    ///
    /// The `@bot` suffix is dropped. Returns `None` for anything that is not
    /// a bot command.
    pub fn command(&self) -> Option<(&str, &str)> {
        let text = self.text.as_deref()?.strip_prefix('/')?;
        let (head, args) = match text.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (text, ""),
        };
        let name = head.split('@').next().unwrap_or(head);
        if name.is_empty() {
            return None;
        }
        Some((name, args))
    }
}

/// A special entity in a text message: hashtag, username, URL, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type", default)]
    pub entity_type: String,
    /// In UTF-16 code units.
    #[serde(default)]
    pub offset: u32,
    /// In UTF-16 code units.
    #[serde(default)]
    pub length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Returned by copyMessage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageId {
    pub message_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message_with_text(text: &str) -> Message {
        serde_json::from_value(json!({
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": {"id": 42, "type": "private"},
            "text": text,
        }))
        .unwrap()
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(message_with_text("/start").command(), Some(("start", "")));
        assert_eq!(
            message_with_text("/search@my_bot  ann ").command(),
            Some(("search", "ann"))
        );
        assert_eq!(message_with_text("hello").command(), None);
        assert_eq!(message_with_text("/").command(), None);
    }

    #[test]
    fn test_sender_id_falls_back_to_sender_chat() {
        let msg: Message = serde_json::from_value(json!({
            "message_id": 3,
            "date": 0,
            "chat": {"id": -100, "type": "channel"},
            "sender_chat": {"id": -100, "type": "channel"},
        }))
        .unwrap();
        assert!(msg.from_user.is_none());
        assert_eq!(msg.sender_id(), Some(-100));
    }

    #[test]
    fn test_timestamp() {
        let msg = message_with_text("hi");
        assert_eq!(msg.timestamp().unwrap().timestamp(), 1_700_000_000);
    }
}
