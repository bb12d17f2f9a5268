use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Collection, DocumentStore, StoredRecord};
use crate::decode::decode_record;
use crate::types::User;

/// SQLite-backed document store. Documents are kept as JSON text.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        // journal_mode PRAGMA returns the resulting mode, so it has to go through query_row
        let _: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;

        // Migrate before wrapping in the async Mutex so no lock is needed here.
        Self::run_migrations(&conn)?;

        info!("Document store initialized at: {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn run_migrations(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                document TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                document TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_records_collection
                ON records(collection, created_at);
            ",
        )
        .context("Failed to run database migrations")?;
        Ok(())
    }
}

fn parse_user(document: &str) -> Result<User> {
    let value: Value = serde_json::from_str(document).context("Corrupt user document")?;
    Ok(decode_record(value)?)
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn upsert_user(&self, user: &User) -> Result<()> {
        let incoming = serde_json::to_value(user).context("Failed to encode user")?;
        let conn = self.conn.lock().await;

        let existing: Option<String> = conn
            .query_row(
                "SELECT document FROM users WHERE id = ?1",
                rusqlite::params![user.id],
                |row| row.get(0),
            )
            .optional()?;

        let mut merged = match existing {
            Some(doc) => serde_json::from_str::<Value>(&doc).context("Corrupt user document")?,
            None => Value::Object(Default::default()),
        };
        if let (Some(target), Value::Object(fields)) = (merged.as_object_mut(), incoming) {
            target.extend(fields);
        }

        conn.execute(
            "INSERT INTO users (id, document, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET document = excluded.document,
                                           updated_at = excluded.updated_at",
            rusqlite::params![user.id, merged.to_string(), Utc::now().to_rfc3339()],
        )
        .with_context(|| format!("Failed to upsert user {}", user.id))?;

        debug!("Upserted user {}", user.id);
        Ok(())
    }

    async fn append_record(&self, collection: Collection, document: &Value) -> Result<String> {
        if collection == Collection::Users {
            bail!("Users are keyed by id; use upsert_user instead");
        }

        let id = Uuid::new_v4().to_string();
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO records (id, collection, document, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                &id,
                collection.as_str(),
                document.to_string(),
                Utc::now().to_rfc3339()
            ],
        )
        .with_context(|| format!("Failed to append to {}", collection))?;

        Ok(id)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock().await;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM users WHERE id = ?1",
                rusqlite::params![id],
                |row| row.get(0),
            )
            .optional()?;

        document.as_deref().map(parse_user).transpose()
    }

    async fn search_users(&self, query: &str, limit: usize) -> Result<Vec<User>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT document FROM users
             WHERE instr(lower(coalesce(json_extract(document, '$.username'), '')), lower(?1)) > 0
                OR instr(lower(coalesce(json_extract(document, '$.first_name'), '')), lower(?1)) > 0
                OR instr(lower(coalesce(json_extract(document, '$.last_name'), '')), lower(?1)) > 0
             ORDER BY id
             LIMIT ?2",
        )?;

        let documents = stmt
            .query_map(rusqlite::params![query, limit as i64], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        documents.iter().map(|doc| parse_user(doc)).collect()
    }

    async fn count(&self, collection: Collection) -> Result<u64> {
        let conn = self.conn.lock().await;
        let count: i64 = match collection {
            Collection::Users => conn.query_row("SELECT count(*) FROM users", [], |row| row.get(0))?,
            other => conn.query_row(
                "SELECT count(*) FROM records WHERE collection = ?1",
                rusqlite::params![other.as_str()],
                |row| row.get(0),
            )?,
        };
        Ok(count as u64)
    }

    async fn records(&self, collection: Collection, limit: usize) -> Result<Vec<StoredRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, document, created_at FROM records
             WHERE collection = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(rusqlite::params![collection.as_str(), limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, document, created_at)| {
                Ok(StoredRecord {
                    document: serde_json::from_str(&document)
                        .with_context(|| format!("Corrupt document {}", id))?,
                    created_at: DateTime::parse_from_rfc3339(&created_at)
                        .with_context(|| format!("Bad timestamp on {}", id))?
                        .with_timezone(&Utc),
                    id,
                    collection,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: i64, first_name: &str, username: Option<&str>) -> User {
        decode_record(json!({
            "id": id,
            "first_name": first_name,
            "username": username,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_document() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.upsert_user(&user(42, "Ann", Some("ann"))).await.unwrap();
        store.upsert_user(&user(42, "Anna", None)).await.unwrap();

        assert_eq!(store.count(Collection::Users).await.unwrap(), 1);
        let stored = store.find_user(42).await.unwrap().unwrap();
        assert_eq!(stored.first_name.as_deref(), Some("Anna"));
        // Not sent the second time, so the earlier value survives.
        assert_eq!(stored.username.as_deref(), Some("ann"));
    }

    #[tokio::test]
    async fn test_append_never_dedups() {
        let store = SqliteStore::open_in_memory().unwrap();
        let doc = json!({"update_id": 1});

        let first = store.append_record(Collection::Updates, &doc).await.unwrap();
        let second = store.append_record(Collection::Updates, &doc).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.count(Collection::Updates).await.unwrap(), 2);
        assert_eq!(store.count(Collection::Messages).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_append_to_users_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store
            .append_record(Collection::Users, &json!({"id": 1}))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.find_user(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_users_matches_names() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.upsert_user(&user(1, "Ann", Some("annie"))).await.unwrap();
        store.upsert_user(&user(2, "Bob", Some("bobby"))).await.unwrap();
        store.upsert_user(&user(3, "Joanna", None)).await.unwrap();

        let ids: Vec<i64> = store
            .search_users("ANN", 10)
            .await
            .unwrap()
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        assert_eq!(store.search_users("ann", 1).await.unwrap().len(), 1);
        assert!(store.search_users("zed", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_newest_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        for n in 0..3 {
            store
                .append_record(Collection::Messages, &json!({"n": n}))
                .await
                .unwrap();
        }

        let records = store.records(Collection::Messages, 2).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].document["n"], 2);
        assert_eq!(records[1].document["n"], 1);
        assert_eq!(records[0].collection, Collection::Messages);
    }

    #[tokio::test]
    async fn test_open_file_database() {
        let dir = std::env::temp_dir().join(format!("tbot-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bot.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.upsert_user(&user(5, "Eve", None)).await.unwrap();
        }
        let reopened = SqliteStore::open(&path).unwrap();
        assert!(reopened.find_user(5).await.unwrap().is_some());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
