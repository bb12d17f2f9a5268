//! Records exchanged with the Bot API.
//!
//! Every record deserializes from the wire JSON as-is. The wire key `from`
//! is bound to a `from_user` field on each record that has a sender.
//! Optional fields that are unset are left out when serializing, so a
//! decoded record re-encodes to the same scalar fields it was read from.

pub mod chat;
pub mod markup;
pub mod media;
pub mod message;
pub mod misc;
pub mod query;
pub mod update;

pub use chat::{
    Chat, ChatInviteLink, ChatMember, ChatMemberStatus, ChatMemberUpdated, ChatPermissions,
    ChatType, User,
};
pub use markup::{
    ForceReply, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, ReplyKeyboardMarkup,
    ReplyKeyboardRemove, ReplyMarkup,
};
pub use media::{
    Animation, Audio, ChatPhoto, Contact, Dice, Document, File, Location, PhotoSize, Poll,
    PollAnswer, PollOption, Sticker, StickerSet, UserProfilePhotos, Venue, Video, VideoNote,
    Voice,
};
pub use message::{Message, MessageEntity, MessageId};
pub use misc::{
    BotCommand, ChatAction, ChatId, GameHighScore, InputMedia, InputMediaType, MaskPosition, ParseMode,
    ResponseParameters, WebhookInfo,
};
pub use query::{
    CallbackQuery, ChosenInlineResult, InlineQuery, LabeledPrice, OrderInfo, PreCheckoutQuery,
    ShippingAddress, ShippingOption, ShippingQuery,
};
pub use update::{Update, UpdateCategory, UpdateKind};
