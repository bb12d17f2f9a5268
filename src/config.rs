use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::transport::DEFAULT_API_URL;
use crate::types::UpdateCategory;
use crate::webhook::HEALTH_PATH;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Public URL registered with setWebhook at startup, if set.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebhookConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default = "default_webhook_path")]
    pub path: String,
    /// Update categories to accept; everything when absent.
    #[serde(default)]
    pub allowed_updates: Option<Vec<String>>,
    #[serde(default)]
    pub secret_token: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            path: default_webhook_path(),
            allowed_updates: None,
            secret_token: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// No persistence when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub user_ids: Vec<i64>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_webhook_path() -> String {
    "/".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        if config.telegram.bot_token.trim().is_empty() {
            anyhow::bail!("[telegram] bot_token must not be empty");
        }
        if !config.webhook.path.starts_with('/') {
            anyhow::bail!("[webhook] path must start with '/', got '{}'", config.webhook.path);
        }
        if config.webhook.path.trim_end_matches('/') == HEALTH_PATH {
            anyhow::bail!("[webhook] path '{}' is reserved for the health check", config.webhook.path);
        }
        // Unknown category names fail here, not at the first update.
        config.allowed_categories()?;

        Ok(config)
    }

    /// `[webhook] allowed_updates` as categories, `None` meaning all of them.
    pub fn allowed_categories(&self) -> Result<Option<Vec<UpdateCategory>>> {
        let Some(names) = &self.webhook.allowed_updates else {
            return Ok(None);
        };
        let categories = names
            .iter()
            .map(|name| name.parse::<UpdateCategory>())
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid [webhook] allowed_updates")?;
        Ok(Some(categories))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_token = "123:abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert!(config.telegram.webhook_url.is_none());
        assert_eq!(config.webhook.listen_addr.port(), 8000);
        assert_eq!(config.webhook.path, "/");
        assert!(config.allowed_categories().unwrap().is_none());
        assert!(config.database.path.is_none());
        assert!(config.admin.user_ids.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            [telegram]
            bot_token = "123:abc"
            api_url = "http://localhost:8081"
            webhook_url = "https://example.com/hook"

            [webhook]
            listen_addr = "127.0.0.1:9000"
            path = "/hook"
            allowed_updates = ["message", "callback_query"]
            secret_token = "s3cret"

            [database]
            path = "bot.db"

            [admin]
            user_ids = [42, 7]
            "#,
        )
        .unwrap();

        assert_eq!(config.webhook.listen_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(
            config.allowed_categories().unwrap(),
            Some(vec![UpdateCategory::Message, UpdateCategory::CallbackQuery])
        );
        assert_eq!(config.webhook.secret_token.as_deref(), Some("s3cret"));
        assert_eq!(config.database.path, Some(PathBuf::from("bot.db")));
        assert_eq!(config.admin.user_ids, vec![42, 7]);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = Config::parse(
            r#"
            [telegram]
            bot_token = "123:abc"

            [webhook]
            allowed_updates = ["mesage"]
            "#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("mesage"));
    }

    #[test]
    fn test_health_path_is_reserved() {
        for path in ["/health", "/health/"] {
            let err = Config::parse(&format!(
                "[telegram]\nbot_token = \"1:x\"\n[webhook]\npath = \"{}\"\n",
                path
            ))
            .unwrap_err();
            assert!(err.to_string().contains("reserved"));
        }
        assert!(Config::parse("[telegram]\nbot_token = \"1:x\"\n[webhook]\npath = \"/healthz\"\n").is_ok());
    }

    #[test]
    fn test_missing_token_is_rejected() {
        assert!(Config::parse("[telegram]\nbot_token = \"\"\n").is_err());
        assert!(Config::parse("[webhook]\npath = \"/\"\n").is_err());
    }

    #[test]
    fn test_load_reads_file() {
        let path = std::env::temp_dir().join(format!("tbot-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[telegram]\nbot_token = \"1:x\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.telegram.bot_token, "1:x");

        std::fs::remove_file(&path).unwrap();
        assert!(Config::load(&path).is_err());
    }
}
