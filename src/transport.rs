use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::decode::{decode_record, decode_slice};
use crate::error::ApiError;
use crate::types::ResponseParameters;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// The envelope every Bot API response comes in.
///
/// `ok: false` is not an error at this level; callers that care use
/// [`ApiResponse::into_result`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ResponseParameters>,
}

impl ApiResponse {
    /// The `result` payload, or `ApiError::Remote` when the call failed.
    pub fn into_result(self) -> Result<Value, ApiError> {
        if !self.ok {
            return Err(ApiError::Remote {
                code: self.error_code.unwrap_or_default(),
                description: self.description.unwrap_or_default(),
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }

    /// Check `ok`, then decode `result` into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let result = self.into_result()?;
        Ok(decode_record(result)?)
    }

    /// Whether `result` looks like a Message (a mapping with a `chat`).
    pub fn carries_message(&self) -> bool {
        self.ok && self.result.as_ref().is_some_and(looks_like_message)
    }

    /// Messages in `result`: the result itself, or the elements of an
    /// array result such as the one sendMediaGroup returns.
    pub fn sent_messages(&self) -> Vec<&Value> {
        if !self.ok {
            return Vec::new();
        }
        match &self.result {
            Some(Value::Array(items)) => items.iter().filter(|v| looks_like_message(v)).collect(),
            Some(value) if looks_like_message(value) => vec![value],
            _ => Vec::new(),
        }
    }
}

fn looks_like_message(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| obj.contains_key("chat"))
}

/// Posts JSON bodies to `<api_url>/bot<token>/<method>`.
///
/// No timeout and no retry: a network failure is returned as-is.
#[derive(Clone)]
pub struct Transport {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl Transport {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    pub async fn post<B>(&self, method: &str, body: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!("Calling Bot API method {}", method);

        let transport_err = |source| ApiError::Transport {
            method: method.to_string(),
            source,
        };

        let response = self
            .client
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await
            .map_err(transport_err)?;

        // Failed calls still carry a JSON envelope, whatever the HTTP status.
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_err)?;
        let envelope: ApiResponse = decode_slice(&bytes)?;

        if !envelope.ok {
            debug!(
                "Bot API method {} returned {}: {}",
                method,
                status,
                envelope.description.as_deref().unwrap_or("")
            );
        }

        Ok(envelope)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockApi;
    use serde_json::json;

    #[test]
    fn test_endpoint_format() {
        let transport = Transport::with_api_url("123:abc", "https://api.example.org/");
        assert_eq!(
            transport.endpoint("getMe"),
            "https://api.example.org/bot123:abc/getMe"
        );
        assert!(!format!("{:?}", transport).contains("123:abc"));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let api = MockApi::start(vec![]).await;
        let transport = Transport::with_api_url("TOKEN", &api.url);

        let response = transport
            .post("sendMessage", &json!({"chat_id": 42, "text": "hi"}))
            .await
            .unwrap();
        assert!(response.ok);

        let calls = api.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].token, "TOKEN");
        assert_eq!(calls[0].method, "sendMessage");
        assert_eq!(calls[0].body, json!({"chat_id": 42, "text": "hi"}));
    }

    #[tokio::test]
    async fn test_remote_failure_is_passed_through() {
        let api = MockApi::start(vec![(
            "getChat",
            json!({"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}),
        )])
        .await;
        let transport = Transport::with_api_url("TOKEN", &api.url);

        let response = transport.post("getChat", &json!({"chat_id": 1})).await.unwrap();
        assert!(!response.ok);
        assert_eq!(response.error_code, Some(400));

        match response.into_result() {
            Err(ApiError::Remote { code, description }) => {
                assert_eq!(code, 400);
                assert!(description.contains("chat not found"));
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on loopback is not listening in test environments.
        let transport = Transport::with_api_url("TOKEN", "http://127.0.0.1:9");
        let err = transport.post("getMe", &json!({})).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }

    #[test]
    fn test_carries_message() {
        let sent = ApiResponse {
            ok: true,
            result: Some(json!({"message_id": 1, "chat": {"id": 1}})),
            description: None,
            error_code: None,
            parameters: None,
        };
        assert!(sent.carries_message());

        let flag = ApiResponse {
            result: Some(json!(true)),
            ..sent
        };
        assert!(!flag.carries_message());
        assert!(flag.sent_messages().is_empty());
    }

    #[test]
    fn test_sent_messages_from_album() {
        let album = ApiResponse {
            ok: true,
            result: Some(json!([
                {"message_id": 1, "chat": {"id": 5}},
                {"message_id": 2, "chat": {"id": 5}}
            ])),
            description: None,
            error_code: None,
            parameters: None,
        };
        assert!(!album.carries_message());
        let sent = album.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1]["message_id"], 2);
    }
}
