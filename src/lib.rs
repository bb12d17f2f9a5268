//! Client library for the Telegram Bot API.
//!
//! - [`api::Bot`] calls remote methods and decodes their results into [`types`].
//! - [`webhook`] receives pushed updates, filtering them with [`filters`],
//!   persisting them through [`storage`] and handing them to a
//!   [`dispatch::HandlerRegistry`].
//! - [`admin::AdminPanel`] answers lookup commands against the store.

pub mod admin;
pub mod api;
pub mod config;
pub mod decode;
pub mod dispatch;
pub mod error;
pub mod filters;
pub mod storage;
pub mod transport;
pub mod types;
pub mod utils;
pub mod webhook;

#[cfg(test)]
mod testing;

pub use api::{Bot, Method};
pub use dispatch::{Handler, HandlerRegistry};
pub use error::{ApiError, DecodeError, FilterError};
pub use filters::{Filter, Operator};
pub use storage::{DocumentStore, SqliteStore};
pub use transport::{ApiResponse, Transport};
pub use types::{Update, UpdateCategory};
