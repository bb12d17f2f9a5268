//! Error types returned by the library surface.
//!
//! Application glue (config, storage, handlers) uses `anyhow` instead.

/// A JSON value could not be bound to the requested record type.
#[derive(Debug, thiserror::Error)]
#[error("failed to decode {target}: {source}")]
pub struct DecodeError {
    pub target: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// Failure of a Bot API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network or HTTP-level failure. Never retried.
    #[error("transport error calling {method}: {source}")]
    Transport {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with `ok: false`.
    #[error("API error {code}: {description}")]
    Remote { code: i64, description: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A filter expression could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("cannot combine an empty set of filters with '{0}'")]
    Empty(&'static str),

    #[error("operator must be either 'and' or 'or', got '{0}'")]
    UnknownOperator(String),

    #[error("unknown update category '{0}'")]
    UnknownCategory(String),
}
