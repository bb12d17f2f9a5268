//! Text-command lookups against the document store, for bot admins.
//!
//! Commands:
//! - `/<id>`: show the stored user with that id
//! - `/search <query>`: list users whose names contain `query`
//! - `/stats`: document counts per collection
//!
//! Restricting who may use the panel is up to the caller, usually with
//! [`Filter::sender_in`](crate::filters::Filter::sender_in).

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::api::{Bot, SendMessage};
use crate::dispatch::Handler;
use crate::storage::{Collection, DocumentStore};
use crate::types::{Update, User};
use crate::utils::split_message;

const REPLY_CHUNK_LEN: usize = 4000;
const SEARCH_LIMIT: usize = 50;

pub struct AdminPanel {
    bot: Bot,
    store: Arc<dyn DocumentStore>,
}

/// `* First Last (id) @username`, skipping whatever is unknown.
pub fn format_user(user: &User) -> String {
    let mut parts = vec!["*".to_string()];
    parts.extend(user.first_name.clone());
    parts.extend(user.last_name.clone());
    parts.push(format!("({})", user.id));
    parts.extend(user.username.as_ref().map(|name| format!("@{}", name)));
    parts.join(" ")
}

impl AdminPanel {
    pub fn new(bot: Bot, store: Arc<dyn DocumentStore>) -> Self {
        Self { bot, store }
    }

    /// Reply texts for a command, without sending anything.
    ///
    /// Text that is not a command gets no reply.
    pub async fn respond(&self, text: &str) -> Result<Vec<String>> {
        let Some(command) = text.trim().strip_prefix('/') else {
            return Ok(Vec::new());
        };
        let (head, args) = match command.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (command, ""),
        };
        let head = head.split('@').next().unwrap_or(head);

        match head {
            "search" => self.search(args).await,
            "stats" => self.stats().await.map(|reply| vec![reply]),
            id => self.lookup(id).await.map(|reply| vec![reply]),
        }
    }

    async fn lookup(&self, id: &str) -> Result<String> {
        let Ok(id) = id.parse::<i64>() else {
            return Ok("User id must be a number!".to_string());
        };
        Ok(match self.store.find_user(id).await? {
            Some(user) => format_user(&user),
            None => "No user found with this id!".to_string(),
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<String>> {
        if query.is_empty() {
            return Ok(vec!["Usage: /search <query>".to_string()]);
        }

        let users = self.store.search_users(query, SEARCH_LIMIT).await?;
        debug!("Admin search '{}' matched {} users", query, users.len());
        if users.is_empty() {
            return Ok(vec!["No users matched.".to_string()]);
        }

        let listing = users.iter().map(format_user).collect::<Vec<_>>().join("\n");
        Ok(split_message(&listing, REPLY_CHUNK_LEN))
    }

    async fn stats(&self) -> Result<String> {
        let mut lines = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            let count = self.store.count(collection).await?;
            lines.push(format!("{}: {}", collection, count));
        }
        Ok(lines.join("\n"))
    }

    /// Answer a text message, quoting it in every reply.
    pub async fn handle(&self, update: &Update) -> Result<()> {
        let Some(msg) = update.message() else {
            return Ok(());
        };
        let Some(text) = msg.text.as_deref() else {
            return Ok(());
        };

        let replies = self.respond(text).await?;
        if !replies.is_empty() {
            info!("Admin command from {:?}: {}", msg.sender_id(), text);
        }

        for reply in replies {
            let params = SendMessage::new(msg.chat.id, reply).reply_to_message_id(msg.message_id);
            self.bot.request(&params).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Handler for AdminPanel {
    async fn handle(&self, update: Arc<Update>) -> Result<()> {
        AdminPanel::handle(self, &update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_record;
    use crate::storage::SqliteStore;
    use crate::testing::MockApi;
    use serde_json::json;

    async fn seeded_store() -> Arc<SqliteStore> {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let users = [
            json!({"id": 42, "first_name": "Ann", "last_name": "Lee", "username": "ann"}),
            json!({"id": 7, "first_name": "Bob"}),
        ];
        for user in users {
            store
                .upsert_user(&decode_record(user).unwrap())
                .await
                .unwrap();
        }
        store
    }

    fn panel(store: Arc<SqliteStore>, api_url: &str) -> AdminPanel {
        AdminPanel::new(Bot::with_api_url("TOKEN", api_url), store)
    }

    #[test]
    fn test_format_user_skips_absent_parts() {
        let full: User =
            decode_record(json!({"id": 42, "first_name": "Ann", "last_name": "Lee", "username": "ann"}))
                .unwrap();
        assert_eq!(format_user(&full), "* Ann Lee (42) @ann");

        let bare: User = decode_record(json!({"id": 7, "first_name": "Bob"})).unwrap();
        assert_eq!(format_user(&bare), "* Bob (7)");
    }

    #[tokio::test]
    async fn test_lookup_replies() {
        let panel = panel(seeded_store().await, "http://127.0.0.1:9");

        assert_eq!(panel.respond("/42").await.unwrap(), vec!["* Ann Lee (42) @ann"]);
        assert_eq!(
            panel.respond("/abc").await.unwrap(),
            vec!["User id must be a number!"]
        );
        assert_eq!(
            panel.respond("/1000").await.unwrap(),
            vec!["No user found with this id!"]
        );
        assert!(panel.respond("hello").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_and_stats() {
        let panel = panel(seeded_store().await, "http://127.0.0.1:9");

        assert_eq!(
            panel.respond("/search bo").await.unwrap(),
            vec!["* Bob (7)"]
        );
        assert_eq!(
            panel.respond("/search nobody").await.unwrap(),
            vec!["No users matched."]
        );
        assert_eq!(
            panel.respond("/stats").await.unwrap(),
            vec!["users: 2\nupdates: 0\nmessages: 0"]
        );
    }

    #[tokio::test]
    async fn test_handle_quotes_the_command() {
        let api = MockApi::start(vec![(
            "sendMessage",
            json!({"ok": true, "result": {"message_id": 2, "chat": {"id": 42, "type": "private"}}}),
        )])
        .await;
        let panel = panel(seeded_store().await, &api.url);

        let update: Update = decode_record(json!({
            "update_id": 1,
            "message": {
                "message_id": 11,
                "from": {"id": 42, "first_name": "Ann"},
                "chat": {"id": 42, "type": "private"},
                "text": "/7"
            }
        }))
        .unwrap();

        panel.handle(&update).await.unwrap();

        let calls = api.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].body,
            json!({"chat_id": 42, "text": "* Bob (7)", "reply_to_message_id": 11})
        );
    }
}
