//! Bot API surface: one call per remote method.
//!
//! Every method has a parameter struct. Its constructor takes the required
//! arguments, and each optional argument has a builder setter. Optional
//! arguments that were never set are left out of the request body.
//!
//! ```no_run
//! # async fn demo() -> Result<(), tbot::ApiError> {
//! use tbot::api::{Bot, SendMessage};
//!
//! let bot = Bot::new("123:abc");
//! let sent = bot
//!     .request(&SendMessage::new(42, "hi").disable_notification(true))
//!     .await?;
//! println!("sent message {}", sent.message_id);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;
use crate::storage::{Collection, DocumentStore};
use crate::transport::{ApiResponse, Transport};
use crate::types::Message;

/// Ties a parameter struct to its wire name and its decoded result.
pub trait Method: Serialize {
    const NAME: &'static str;
    type Output: DeserializeOwned;
}

/// Declares a method's parameter struct, its [`Method`] impl and the
/// matching call on [`Bot`].
///
/// Optional fields marked `[into]` get a setter taking `impl Into<T>`;
/// the others take `T` itself so numeric literals infer cleanly.
macro_rules! api_method {
    (@setter $field:ident [into] $ty:ty) => {
        pub fn $field(mut self, $field: impl Into<$ty>) -> Self {
            self.$field = Some($field.into());
            self
        }
    };
    (@setter $field:ident $ty:ty) => {
        pub fn $field(mut self, $field: $ty) -> Self {
            self.$field = Some($field);
            self
        }
    };
    (
        $(#[$meta:meta])*
        $name:ident => $wire:literal, $call:ident -> $output:ty {
            $( $req:ident : $req_ty:ty ),* $(,)?
        }
        $( optional {
            $( $(#[$opt_meta:meta])* $opt:ident $([$conv:ident])? : $opt_ty:ty ),* $(,)?
        } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize)]
        pub struct $name {
            $( pub $req: $req_ty, )*
            $($(
                $(#[$opt_meta])*
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $opt: Option<$opt_ty>,
            )*)?
        }

        impl $name {
            #[allow(clippy::new_without_default)]
            pub fn new($( $req: impl Into<$req_ty> ),*) -> Self {
                Self {
                    $( $req: $req.into(), )*
                    $($( $opt: None, )*)?
                }
            }

            $($(
                api_method!(@setter $opt $([$conv])? $opt_ty);
            )*)?
        }

        impl $crate::api::Method for $name {
            const NAME: &'static str = $wire;
            type Output = $output;
        }

        impl $crate::api::Bot {
            #[doc = concat!("Calls `", $wire, "` and returns the raw response envelope.")]
            pub async fn $call(
                &self,
                params: &$name,
            ) -> Result<$crate::transport::ApiResponse, $crate::error::ApiError> {
                self.call(params).await
            }
        }
    };
}

mod methods;

pub use methods::*;

/// Result of edit calls: the edited Message, or `true` for inline messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditResult {
    Message(Box<Message>),
    Done(bool),
}

/// Entry point to the Bot API.
///
/// When a document store is attached, every successful call whose result
/// is a Message gets appended to the `messages` collection.
#[derive(Clone)]
pub struct Bot {
    transport: Transport,
    store: Option<Arc<dyn DocumentStore>>,
}

impl Bot {
    pub fn new(token: impl Into<String>) -> Self {
        Self::from_transport(Transport::new(token))
    }

    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self::from_transport(Transport::with_api_url(token, api_url))
    }

    pub fn from_transport(transport: Transport) -> Self {
        Self {
            transport,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Send `params` and return the raw envelope, `ok: false` included.
    pub async fn call<M: Method>(&self, params: &M) -> Result<ApiResponse, ApiError> {
        let response = self.transport.post(M::NAME, params).await?;
        self.record_sent(M::NAME, &response).await;
        Ok(response)
    }

    /// Send `params` and decode the result, failing on `ok: false`.
    pub async fn request<M: Method>(&self, params: &M) -> Result<M::Output, ApiError> {
        self.call(params).await?.decode()
    }

    /// Escape hatch for methods without a parameter struct.
    pub async fn call_raw(&self, method: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        let response = self.transport.post(method, body).await?;
        self.record_sent(method, &response).await;
        Ok(response)
    }

    async fn record_sent(&self, method: &str, response: &ApiResponse) {
        let Some(store) = &self.store else {
            return;
        };
        // The remote call already succeeded; a storage hiccup must not turn it into a failure.
        for message in response.sent_messages() {
            if let Err(e) = store.append_record(Collection::Messages, message).await {
                warn!("Failed to record message returned by {}: {:#}", method, e);
            }
        }
    }
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("transport", &self.transport)
            .field("store", &self.store.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;
    use crate::testing::MockApi;
    use crate::types::{ChatId, InputMedia, LabeledPrice, ParseMode, UpdateCategory};
    use serde_json::json;

    fn sent_message() -> Value {
        json!({
            "ok": true,
            "result": {
                "message_id": 99,
                "from": {"id": 1, "is_bot": true, "first_name": "Bot"},
                "chat": {"id": 42, "type": "private"},
                "date": 1_700_000_000,
                "text": "hi"
            }
        })
    }

    #[test]
    fn test_only_explicit_arguments_are_serialized() {
        let params = SendMessage::new(42, "hi");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"chat_id": 42, "text": "hi"})
        );

        let params = params.parse_mode(ParseMode::Html).reply_to_message_id(7);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"chat_id": 42, "text": "hi", "parse_mode": "HTML", "reply_to_message_id": 7})
        );
    }

    #[test]
    fn test_chat_id_accepts_usernames() {
        let params = SendMessage::new("@channel", "news");
        assert_eq!(params.chat_id, ChatId::Username("@channel".to_string()));
        assert_eq!(serde_json::to_value(&params).unwrap()["chat_id"], "@channel");
    }

    #[test]
    fn test_parameterless_methods_send_empty_object() {
        assert_eq!(serde_json::to_value(GetMe::new()).unwrap(), json!({}));
        assert_eq!(GetMe::NAME, "getMe");
    }

    #[test]
    fn test_allowed_updates_use_wire_names() {
        let params = SetWebhook::new("https://example.com/hook")
            .allowed_updates(vec![UpdateCategory::Message, UpdateCategory::CallbackQuery]);
        assert_eq!(
            serde_json::to_value(&params).unwrap()["allowed_updates"],
            json!(["message", "callback_query"])
        );
    }

    #[tokio::test]
    async fn test_send_message_posts_exact_body() {
        let api = MockApi::start(vec![("sendMessage", sent_message())]).await;
        let bot = Bot::with_api_url("TOKEN", &api.url);

        let response = bot.send_message(&SendMessage::new(42, "hi")).await.unwrap();
        assert!(response.ok);

        let calls = api.calls().await;
        assert_eq!(calls[0].method, "sendMessage");
        assert_eq!(calls[0].body, json!({"chat_id": 42, "text": "hi"}));
    }

    #[tokio::test]
    async fn test_request_decodes_result() {
        let api = MockApi::start(vec![("sendMessage", sent_message())]).await;
        let bot = Bot::with_api_url("TOKEN", &api.url);

        let msg = bot.request(&SendMessage::new(42, "hi")).await.unwrap();
        assert_eq!(msg.message_id, 99);
        assert_eq!(msg.from_user.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_request_surfaces_remote_errors() {
        let api = MockApi::start(vec![(
            "getChat",
            json!({"ok": false, "error_code": 403, "description": "Forbidden"}),
        )])
        .await;
        let bot = Bot::with_api_url("TOKEN", &api.url);

        let err = bot.request(&GetChat::new(5)).await.unwrap_err();
        assert!(matches!(err, ApiError::Remote { code: 403, .. }));
    }

    #[tokio::test]
    async fn test_edit_result_accepts_true() {
        let api = MockApi::start(vec![]).await;
        let bot = Bot::with_api_url("TOKEN", &api.url);

        let result = bot
            .request(&EditMessageText::new("edited").inline_message_id("abc"))
            .await
            .unwrap();
        assert_eq!(result, EditResult::Done(true));
    }

    #[tokio::test]
    async fn test_sent_messages_are_recorded() {
        let api = MockApi::start(vec![("sendMessage", sent_message())]).await;
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let bot = Bot::with_api_url("TOKEN", &api.url).with_store(store.clone());

        bot.send_message(&SendMessage::new(42, "hi")).await.unwrap();
        // `true` results are not messages.
        bot.call(&DeleteMessage::new(42, 99)).await.unwrap();

        assert_eq!(store.count(Collection::Messages).await.unwrap(), 1);
    }

    #[test]
    fn test_media_is_sent_by_reference() {
        let params = SendMediaGroup::new(
            42,
            vec![
                InputMedia::photo("AgACfileid").caption("first"),
                InputMedia::video("https://example.com/clip.mp4"),
            ],
        );
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "chat_id": 42,
                "media": [
                    {"type": "photo", "media": "AgACfileid", "caption": "first"},
                    {"type": "video", "media": "https://example.com/clip.mp4"}
                ]
            })
        );

        let edit = EditMessageMedia::new(InputMedia::document("BQACdoc")).inline_message_id("abc");
        assert_eq!(
            serde_json::to_value(&edit).unwrap(),
            json!({"media": {"type": "document", "media": "BQACdoc"}, "inline_message_id": "abc"})
        );
    }

    #[test]
    fn test_invoice_body() {
        let params = SendInvoice::new(
            42,
            "Coffee",
            "One cup",
            "order-1",
            "provider",
            "EUR",
            vec![LabeledPrice::new("Cup", 250)],
        )
        .suggested_tip_amounts(vec![50, 100]);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "chat_id": 42,
                "title": "Coffee",
                "description": "One cup",
                "payload": "order-1",
                "provider_token": "provider",
                "currency": "EUR",
                "prices": [{"label": "Cup", "amount": 250}],
                "suggested_tip_amounts": [50, 100]
            })
        );
        assert_eq!(SetPassportDataErrors::NAME, "setPassportDataErrors");
    }

    #[tokio::test]
    async fn test_album_messages_are_recorded() {
        let album = json!({
            "ok": true,
            "result": [
                {"message_id": 1, "chat": {"id": 42, "type": "private"}, "date": 0},
                {"message_id": 2, "chat": {"id": 42, "type": "private"}, "date": 0}
            ]
        });
        let api = MockApi::start(vec![("sendMediaGroup", album)]).await;
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let bot = Bot::with_api_url("TOKEN", &api.url).with_store(store.clone());

        let params = SendMediaGroup::new(
            42,
            vec![InputMedia::photo("a"), InputMedia::photo("b")],
        );
        let sent = bot.request(&params).await.unwrap();

        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].message_id, 2);
        assert_eq!(store.count(Collection::Messages).await.unwrap(), 2);
    }
}
