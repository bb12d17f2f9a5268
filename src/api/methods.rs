use serde_json::Value;

use super::EditResult;
use crate::types::{
    BotCommand, Chat, ChatAction, ChatId, ChatInviteLink, ChatMember, ChatPermissions, File,
    GameHighScore, InlineKeyboardMarkup, InputMedia, LabeledPrice, MaskPosition, Message,
    MessageEntity, MessageId, ParseMode, Poll, ReplyMarkup, ShippingOption, StickerSet, Update,
    UpdateCategory, User, UserProfilePhotos, WebhookInfo,
};

// Getting updates

api_method! {
    /// Long-poll for updates. Unused while a webhook is set.
    GetUpdates => "getUpdates", get_updates -> Vec<Update> {}
    optional {
        offset: i64,
        limit: u32,
        timeout: u32,
        allowed_updates [into]: Vec<UpdateCategory>,
    }
}

api_method! {
    SetWebhook => "setWebhook", set_webhook -> bool {
        url: String,
    }
    optional {
        ip_address [into]: String,
        max_connections: u32,
        allowed_updates [into]: Vec<UpdateCategory>,
        drop_pending_updates: bool,
        secret_token [into]: String,
    }
}

api_method! {
    DeleteWebhook => "deleteWebhook", delete_webhook -> bool {}
    optional {
        drop_pending_updates: bool,
    }
}

api_method! {
    GetWebhookInfo => "getWebhookInfo", get_webhook_info -> WebhookInfo {}
}

// Bot account

api_method! {
    GetMe => "getMe", get_me -> User {}
}

api_method! {
    LogOut => "logOut", log_out -> bool {}
}

api_method! {
    Close => "close", close -> bool {}
}

// Sending messages

api_method! {
    SendMessage => "sendMessage", send_message -> Message {
        chat_id: ChatId,
        text: String,
    }
    optional {
        parse_mode: ParseMode,
        entities [into]: Vec<MessageEntity>,
        disable_web_page_preview: bool,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    ForwardMessage => "forwardMessage", forward_message -> Message {
        chat_id: ChatId,
        from_chat_id: ChatId,
        message_id: i64,
    }
    optional {
        disable_notification: bool,
        protect_content: bool,
    }
}

api_method! {
    /// Like forwarding, without the link to the original message.
    CopyMessage => "copyMessage", copy_message -> MessageId {
        chat_id: ChatId,
        from_chat_id: ChatId,
        message_id: i64,
    }
    optional {
        caption [into]: String,
        parse_mode: ParseMode,
        caption_entities [into]: Vec<MessageEntity>,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    /// `photo` is a file_id already on the servers, or an HTTP URL.
    SendPhoto => "sendPhoto", send_photo -> Message {
        chat_id: ChatId,
        photo: String,
    }
    optional {
        caption [into]: String,
        parse_mode: ParseMode,
        caption_entities [into]: Vec<MessageEntity>,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    SendAudio => "sendAudio", send_audio -> Message {
        chat_id: ChatId,
        audio: String,
    }
    optional {
        caption [into]: String,
        parse_mode: ParseMode,
        caption_entities [into]: Vec<MessageEntity>,
        duration: u32,
        performer [into]: String,
        title [into]: String,
        thumb [into]: String,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    SendDocument => "sendDocument", send_document -> Message {
        chat_id: ChatId,
        document: String,
    }
    optional {
        thumb [into]: String,
        caption [into]: String,
        parse_mode: ParseMode,
        caption_entities [into]: Vec<MessageEntity>,
        disable_content_type_detection: bool,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    SendVideo => "sendVideo", send_video -> Message {
        chat_id: ChatId,
        video: String,
    }
    optional {
        duration: u32,
        width: u32,
        height: u32,
        thumb [into]: String,
        caption [into]: String,
        parse_mode: ParseMode,
        caption_entities [into]: Vec<MessageEntity>,
        supports_streaming: bool,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    SendAnimation => "sendAnimation", send_animation -> Message {
        chat_id: ChatId,
        animation: String,
    }
    optional {
        duration: u32,
        width: u32,
        height: u32,
        thumb [into]: String,
        caption [into]: String,
        parse_mode: ParseMode,
        caption_entities [into]: Vec<MessageEntity>,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    SendVoice => "sendVoice", send_voice -> Message {
        chat_id: ChatId,
        voice: String,
    }
    optional {
        caption [into]: String,
        parse_mode: ParseMode,
        caption_entities [into]: Vec<MessageEntity>,
        duration: u32,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    SendVideoNote => "sendVideoNote", send_video_note -> Message {
        chat_id: ChatId,
        video_note: String,
    }
    optional {
        duration: u32,
        length: u32,
        thumb [into]: String,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    /// Sends 2 to 10 photos, videos, documents or audios as one album.
    SendMediaGroup => "sendMediaGroup", send_media_group -> Vec<Message> {
        chat_id: ChatId,
        media: Vec<InputMedia>,
    }
    optional {
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
    }
}

api_method! {
    SendLocation => "sendLocation", send_location -> Message {
        chat_id: ChatId,
        latitude: f64,
        longitude: f64,
    }
    optional {
        horizontal_accuracy: f64,
        /// Seconds the location stays live, 60 to 86400.
        live_period: u32,
        heading: u32,
        proximity_alert_radius: u32,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    /// Target either `chat_id` plus `message_id`, or `inline_message_id`.
    EditMessageLiveLocation => "editMessageLiveLocation", edit_message_live_location -> EditResult {
        latitude: f64,
        longitude: f64,
    }
    optional {
        chat_id [into]: ChatId,
        message_id: i64,
        inline_message_id [into]: String,
        horizontal_accuracy: f64,
        heading: u32,
        proximity_alert_radius: u32,
        reply_markup: InlineKeyboardMarkup,
    }
}

api_method! {
    StopMessageLiveLocation => "stopMessageLiveLocation", stop_message_live_location -> EditResult {}
    optional {
        chat_id [into]: ChatId,
        message_id: i64,
        inline_message_id [into]: String,
        reply_markup: InlineKeyboardMarkup,
    }
}

api_method! {
    SendVenue => "sendVenue", send_venue -> Message {
        chat_id: ChatId,
        latitude: f64,
        longitude: f64,
        title: String,
        address: String,
    }
    optional {
        foursquare_id [into]: String,
        foursquare_type [into]: String,
        google_place_id [into]: String,
        google_place_type [into]: String,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    SendContact => "sendContact", send_contact -> Message {
        chat_id: ChatId,
        phone_number: String,
        first_name: String,
    }
    optional {
        last_name [into]: String,
        vcard [into]: String,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    SendPoll => "sendPoll", send_poll -> Message {
        chat_id: ChatId,
        question: String,
        options: Vec<String>,
    }
    optional {
        is_anonymous: bool,
        /// "regular" or "quiz".
        #[serde(rename = "type")]
        poll_type [into]: String,
        allows_multiple_answers: bool,
        correct_option_id: u32,
        explanation [into]: String,
        explanation_parse_mode: ParseMode,
        open_period: u32,
        close_date: i64,
        is_closed: bool,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    SendDice => "sendDice", send_dice -> Message {
        chat_id: ChatId,
    }
    optional {
        emoji [into]: String,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    SendChatAction => "sendChatAction", send_chat_action -> bool {
        chat_id: ChatId,
        action: ChatAction,
    }
}

// Users and files

api_method! {
    GetUserProfilePhotos => "getUserProfilePhotos", get_user_profile_photos -> UserProfilePhotos {
        user_id: i64,
    }
    optional {
        offset: u32,
        limit: u32,
    }
}

api_method! {
    /// The returned `file_path` is valid for about an hour.
    GetFile => "getFile", get_file -> File {
        file_id: String,
    }
}

// Chat administration

api_method! {
    BanChatMember => "banChatMember", ban_chat_member -> bool {
        chat_id: ChatId,
        user_id: i64,
    }
    optional {
        until_date: i64,
        revoke_messages: bool,
    }
}

api_method! {
    UnbanChatMember => "unbanChatMember", unban_chat_member -> bool {
        chat_id: ChatId,
        user_id: i64,
    }
    optional {
        only_if_banned: bool,
    }
}

api_method! {
    RestrictChatMember => "restrictChatMember", restrict_chat_member -> bool {
        chat_id: ChatId,
        user_id: i64,
        permissions: ChatPermissions,
    }
    optional {
        until_date: i64,
    }
}

api_method! {
    PromoteChatMember => "promoteChatMember", promote_chat_member -> bool {
        chat_id: ChatId,
        user_id: i64,
    }
    optional {
        is_anonymous: bool,
        can_manage_chat: bool,
        can_post_messages: bool,
        can_edit_messages: bool,
        can_delete_messages: bool,
        can_manage_video_chats: bool,
        can_restrict_members: bool,
        can_promote_members: bool,
        can_change_info: bool,
        can_invite_users: bool,
        can_pin_messages: bool,
    }
}

api_method! {
    SetChatAdministratorCustomTitle => "setChatAdministratorCustomTitle", set_chat_administrator_custom_title -> bool {
        chat_id: ChatId,
        user_id: i64,
        custom_title: String,
    }
}

api_method! {
    SetChatPermissions => "setChatPermissions", set_chat_permissions -> bool {
        chat_id: ChatId,
        permissions: ChatPermissions,
    }
}

api_method! {
    /// Revokes the previous primary link.
    ExportChatInviteLink => "exportChatInviteLink", export_chat_invite_link -> String {
        chat_id: ChatId,
    }
}

api_method! {
    CreateChatInviteLink => "createChatInviteLink", create_chat_invite_link -> ChatInviteLink {
        chat_id: ChatId,
    }
    optional {
        name [into]: String,
        expire_date: i64,
        member_limit: u32,
        creates_join_request: bool,
    }
}

api_method! {
    EditChatInviteLink => "editChatInviteLink", edit_chat_invite_link -> ChatInviteLink {
        chat_id: ChatId,
        invite_link: String,
    }
    optional {
        name [into]: String,
        expire_date: i64,
        member_limit: u32,
        creates_join_request: bool,
    }
}

api_method! {
    RevokeChatInviteLink => "revokeChatInviteLink", revoke_chat_invite_link -> ChatInviteLink {
        chat_id: ChatId,
        invite_link: String,
    }
}

api_method! {
    DeleteChatPhoto => "deleteChatPhoto", delete_chat_photo -> bool {
        chat_id: ChatId,
    }
}

api_method! {
    SetChatTitle => "setChatTitle", set_chat_title -> bool {
        chat_id: ChatId,
        title: String,
    }
}

api_method! {
    SetChatDescription => "setChatDescription", set_chat_description -> bool {
        chat_id: ChatId,
    }
    optional {
        description [into]: String,
    }
}

api_method! {
    PinChatMessage => "pinChatMessage", pin_chat_message -> bool {
        chat_id: ChatId,
        message_id: i64,
    }
    optional {
        disable_notification: bool,
    }
}

api_method! {
    /// Without `message_id`, unpins the most recent pinned message.
    UnpinChatMessage => "unpinChatMessage", unpin_chat_message -> bool {
        chat_id: ChatId,
    }
    optional {
        message_id: i64,
    }
}

api_method! {
    UnpinAllChatMessages => "unpinAllChatMessages", unpin_all_chat_messages -> bool {
        chat_id: ChatId,
    }
}

api_method! {
    LeaveChat => "leaveChat", leave_chat -> bool {
        chat_id: ChatId,
    }
}

api_method! {
    GetChat => "getChat", get_chat -> Chat {
        chat_id: ChatId,
    }
}

api_method! {
    GetChatAdministrators => "getChatAdministrators", get_chat_administrators -> Vec<ChatMember> {
        chat_id: ChatId,
    }
}

api_method! {
    GetChatMemberCount => "getChatMemberCount", get_chat_member_count -> i64 {
        chat_id: ChatId,
    }
}

api_method! {
    GetChatMember => "getChatMember", get_chat_member -> ChatMember {
        chat_id: ChatId,
        user_id: i64,
    }
}

api_method! {
    SetChatStickerSet => "setChatStickerSet", set_chat_sticker_set -> bool {
        chat_id: ChatId,
        sticker_set_name: String,
    }
}

api_method! {
    DeleteChatStickerSet => "deleteChatStickerSet", delete_chat_sticker_set -> bool {
        chat_id: ChatId,
    }
}

// Queries and commands

api_method! {
    AnswerCallbackQuery => "answerCallbackQuery", answer_callback_query -> bool {
        callback_query_id: String,
    }
    optional {
        text [into]: String,
        show_alert: bool,
        url [into]: String,
        cache_time: u32,
    }
}

api_method! {
    /// `scope` is a BotCommandScope object, passed through as JSON.
    SetMyCommands => "setMyCommands", set_my_commands -> bool {
        commands: Vec<BotCommand>,
    }
    optional {
        scope: Value,
        language_code [into]: String,
    }
}

api_method! {
    DeleteMyCommands => "deleteMyCommands", delete_my_commands -> bool {}
    optional {
        scope: Value,
        language_code [into]: String,
    }
}

api_method! {
    GetMyCommands => "getMyCommands", get_my_commands -> Vec<BotCommand> {}
    optional {
        scope: Value,
        language_code [into]: String,
    }
}

// Updating messages

api_method! {
    EditMessageText => "editMessageText", edit_message_text -> EditResult {
        text: String,
    }
    optional {
        chat_id [into]: ChatId,
        message_id: i64,
        inline_message_id [into]: String,
        parse_mode: ParseMode,
        entities [into]: Vec<MessageEntity>,
        disable_web_page_preview: bool,
        reply_markup: InlineKeyboardMarkup,
    }
}

api_method! {
    EditMessageCaption => "editMessageCaption", edit_message_caption -> EditResult {}
    optional {
        chat_id [into]: ChatId,
        message_id: i64,
        inline_message_id [into]: String,
        caption [into]: String,
        parse_mode: ParseMode,
        caption_entities [into]: Vec<MessageEntity>,
        reply_markup: InlineKeyboardMarkup,
    }
}

api_method! {
    EditMessageReplyMarkup => "editMessageReplyMarkup", edit_message_reply_markup -> EditResult {}
    optional {
        chat_id [into]: ChatId,
        message_id: i64,
        inline_message_id [into]: String,
        reply_markup: InlineKeyboardMarkup,
    }
}

api_method! {
    EditMessageMedia => "editMessageMedia", edit_message_media -> EditResult {
        media: InputMedia,
    }
    optional {
        chat_id [into]: ChatId,
        message_id: i64,
        inline_message_id [into]: String,
        reply_markup: InlineKeyboardMarkup,
    }
}

api_method! {
    StopPoll => "stopPoll", stop_poll -> Poll {
        chat_id: ChatId,
        message_id: i64,
    }
    optional {
        reply_markup: InlineKeyboardMarkup,
    }
}

api_method! {
    /// Only messages younger than 48 hours can be deleted.
    DeleteMessage => "deleteMessage", delete_message -> bool {
        chat_id: ChatId,
        message_id: i64,
    }
}

// Stickers

api_method! {
    SendSticker => "sendSticker", send_sticker -> Message {
        chat_id: ChatId,
        sticker: String,
    }
    optional {
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup [into]: ReplyMarkup,
    }
}

api_method! {
    GetStickerSet => "getStickerSet", get_sticker_set -> StickerSet {
        name: String,
    }
}

api_method! {
    /// `png_sticker` is a file_id or an HTTP URL. `name` must end in `_by_<bot username>`.
    CreateNewStickerSet => "createNewStickerSet", create_new_sticker_set -> bool {
        user_id: i64,
        name: String,
        title: String,
        emojis: String,
    }
    optional {
        png_sticker [into]: String,
        contains_masks: bool,
        mask_position: MaskPosition,
    }
}

api_method! {
    AddStickerToSet => "addStickerToSet", add_sticker_to_set -> bool {
        user_id: i64,
        name: String,
        emojis: String,
    }
    optional {
        png_sticker [into]: String,
        mask_position: MaskPosition,
    }
}

api_method! {
    /// Sets are only editable by the bot that created them.
    SetStickerPositionInSet => "setStickerPositionInSet", set_sticker_position_in_set -> bool {
        sticker: String,
        position: u32,
    }
}

api_method! {
    DeleteStickerFromSet => "deleteStickerFromSet", delete_sticker_from_set -> bool {
        sticker: String,
    }
}

api_method! {
    /// `thumb` is a file_id or an HTTP URL; without it the thumbnail is removed.
    SetStickerSetThumb => "setStickerSetThumb", set_sticker_set_thumb -> bool {
        name: String,
        user_id: i64,
    }
    optional {
        thumb [into]: String,
    }
}

// Inline mode

api_method! {
    /// `results` are InlineQueryResult objects, passed through as JSON.
    AnswerInlineQuery => "answerInlineQuery", answer_inline_query -> bool {
        inline_query_id: String,
        results: Vec<Value>,
    }
    optional {
        cache_time: u32,
        is_personal: bool,
        next_offset [into]: String,
        switch_pm_text [into]: String,
        switch_pm_parameter [into]: String,
    }
}

// Payments

api_method! {
    /// Amounts are in the smallest units of `currency`.
    SendInvoice => "sendInvoice", send_invoice -> Message {
        chat_id: ChatId,
        title: String,
        description: String,
        payload: String,
        provider_token: String,
        currency: String,
        prices: Vec<LabeledPrice>,
    }
    optional {
        max_tip_amount: i64,
        suggested_tip_amounts: Vec<i64>,
        start_parameter [into]: String,
        provider_data [into]: String,
        photo_url [into]: String,
        photo_size: u64,
        photo_width: u32,
        photo_height: u32,
        need_name: bool,
        need_phone_number: bool,
        need_email: bool,
        need_shipping_address: bool,
        send_phone_number_to_provider: bool,
        send_email_to_provider: bool,
        is_flexible: bool,
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup: InlineKeyboardMarkup,
    }
}

api_method! {
    /// `shipping_options` is required when `ok` is true, `error_message` when it is false.
    AnswerShippingQuery => "answerShippingQuery", answer_shipping_query -> bool {
        shipping_query_id: String,
        ok: bool,
    }
    optional {
        shipping_options [into]: Vec<ShippingOption>,
        error_message [into]: String,
    }
}

api_method! {
    AnswerPreCheckoutQuery => "answerPreCheckoutQuery", answer_pre_checkout_query -> bool {
        pre_checkout_query_id: String,
        ok: bool,
    }
    optional {
        error_message [into]: String,
    }
}

// Telegram Passport

api_method! {
    /// `errors` are PassportElementError objects, passed through as JSON.
    SetPassportDataErrors => "setPassportDataErrors", set_passport_data_errors -> bool {
        user_id: i64,
        errors: Vec<Value>,
    }
}

// Games

api_method! {
    SendGame => "sendGame", send_game -> Message {
        chat_id: i64,
        game_short_name: String,
    }
    optional {
        disable_notification: bool,
        protect_content: bool,
        reply_to_message_id: i64,
        allow_sending_without_reply: bool,
        reply_markup: InlineKeyboardMarkup,
    }
}

api_method! {
    SetGameScore => "setGameScore", set_game_score -> EditResult {
        user_id: i64,
        score: i64,
    }
    optional {
        force: bool,
        disable_edit_message: bool,
        chat_id: i64,
        message_id: i64,
        inline_message_id [into]: String,
    }
}

api_method! {
    GetGameHighScores => "getGameHighScores", get_game_high_scores -> Vec<GameHighScore> {
        user_id: i64,
    }
    optional {
        chat_id: i64,
        message_id: i64,
        inline_message_id [into]: String,
    }
}

impl AnswerShippingQuery {
    pub fn with_options(shipping_query_id: impl Into<String>, options: Vec<ShippingOption>) -> Self {
        Self::new(shipping_query_id, true).shipping_options(options)
    }

    pub fn with_error(shipping_query_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(shipping_query_id, false).error_message(message)
    }
}
