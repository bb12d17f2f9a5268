//! Document persistence for updates, sent messages and known users.

pub mod sqlite;

pub use sqlite::SqliteStore;

use std::fmt;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::types::{Update, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Keyed by user id, written with [`DocumentStore::upsert_user`].
    Users,
    Updates,
    Messages,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Users, Collection::Updates, Collection::Messages];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Updates => "updates",
            Collection::Messages => "messages",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One appended document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: String,
    pub collection: Collection,
    pub document: Value,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Merge `user` into the stored document with the same id, or insert it.
    /// Fields absent from `user` keep their stored value.
    async fn upsert_user(&self, user: &User) -> Result<()>;

    /// Insert `document` into `collection` and return its generated id.
    /// Nothing is deduplicated.
    async fn append_record(&self, collection: Collection, document: &Value) -> Result<String>;

    async fn find_user(&self, id: i64) -> Result<Option<User>>;

    /// Users whose username, first or last name contains `query`, ignoring case.
    async fn search_users(&self, query: &str, limit: usize) -> Result<Vec<User>>;

    async fn count(&self, collection: Collection) -> Result<u64>;

    /// Most recent first.
    async fn records(&self, collection: Collection, limit: usize) -> Result<Vec<StoredRecord>>;
}

/// Record an incoming update and remember the user who sent it.
pub async fn persist_update(store: &dyn DocumentStore, update: &Update) -> Result<()> {
    let document = serde_json::to_value(update)
        .with_context(|| format!("Failed to encode update {}", update.update_id))?;
    store.append_record(Collection::Updates, &document).await?;

    if let Some(user) = update.message().and_then(|msg| msg.from_user.as_ref()) {
        store.upsert_user(user).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_record;
    use serde_json::json;

    #[tokio::test]
    async fn test_persist_update_records_update_and_sender() {
        let store = SqliteStore::open_in_memory().unwrap();
        let update: Update = decode_record(json!({
            "update_id": 3,
            "message": {
                "message_id": 1,
                "from": {"id": 42, "first_name": "Ann", "username": "ann"},
                "chat": {"id": 42, "type": "private"},
                "text": "hi"
            }
        }))
        .unwrap();

        persist_update(&store, &update).await.unwrap();

        assert_eq!(store.count(Collection::Updates).await.unwrap(), 1);
        let user = store.find_user(42).await.unwrap().unwrap();
        assert_eq!(user.username.as_deref(), Some("ann"));

        let records = store.records(Collection::Updates, 10).await.unwrap();
        assert_eq!(records[0].document["update_id"], 3);
        assert_eq!(records[0].document["message"]["from"]["id"], 42);
    }

    #[tokio::test]
    async fn test_persist_update_without_sender() {
        let store = SqliteStore::open_in_memory().unwrap();
        let update: Update = decode_record(json!({
            "update_id": 4,
            "poll": {
                "id": "p1",
                "question": "?",
                "options": [],
                "total_voter_count": 0,
                "is_closed": false,
                "is_anonymous": true,
                "type": "regular",
                "allows_multiple_answers": false
            }
        }))
        .unwrap();

        persist_update(&store, &update).await.unwrap();
        assert_eq!(store.count(Collection::Updates).await.unwrap(), 1);
        assert_eq!(store.count(Collection::Users).await.unwrap(), 0);
    }
}
