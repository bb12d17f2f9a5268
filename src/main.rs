use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tbot::admin::AdminPanel;
use tbot::api::{Bot, SendMessage, SetWebhook};
use tbot::config::Config;
use tbot::webhook::{self, WebhookState};
use tbot::{DocumentStore, Filter, HandlerRegistry, SqliteStore, Update, UpdateCategory};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  API: {}", config.telegram.api_url);
    info!("  Listen: {}{}", config.webhook.listen_addr, config.webhook.path);
    info!("  Admins: {:?}", config.admin.user_ids);

    let store: Option<Arc<dyn DocumentStore>> = match &config.database.path {
        Some(path) => Some(Arc::new(SqliteStore::open(path)?)),
        None => None,
    };

    let mut bot = Bot::with_api_url(&config.telegram.bot_token, &config.telegram.api_url);
    if let Some(store) = &store {
        bot = bot.with_store(store.clone());
    }

    let allowed = config.allowed_categories()?;

    if let Some(url) = &config.telegram.webhook_url {
        let mut params = SetWebhook::new(url.as_str());
        if let Some(categories) = &allowed {
            params = params.allowed_updates(categories.clone());
        }
        if let Some(secret) = &config.webhook.secret_token {
            params = params.secret_token(secret.as_str());
        }
        bot.request(&params)
            .await
            .with_context(|| format!("Failed to register webhook {}", url))?;
        info!("Webhook registered at {}", url);
    }

    let registry = build_registry(&bot, store.clone(), &config.admin.user_ids);

    let mut state = WebhookState::new(registry);
    if let Some(categories) = allowed {
        state = state.with_filter(Filter::categories(categories));
    }
    if let Some(store) = store {
        state = state.with_store(store);
    }
    if let Some(secret) = &config.webhook.secret_token {
        state = state.with_secret_token(secret.as_str());
    }

    info!("Bot is starting...");
    webhook::run_server(config.webhook.listen_addr, &config.webhook.path, state).await
}

fn is_command(update: &Update) -> bool {
    update
        .message()
        .and_then(|msg| msg.text.as_deref())
        .is_some_and(|text| text.starts_with('/'))
}

fn build_registry(
    bot: &Bot,
    store: Option<Arc<dyn DocumentStore>>,
    admin_ids: &[i64],
) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    match store {
        Some(store) if !admin_ids.is_empty() => {
            let admins = Filter::sender_in(admin_ids.iter().copied()).and(is_command);
            registry.on_filtered(admins, AdminPanel::new(bot.clone(), store));
        }
        None if !admin_ids.is_empty() => {
            warn!("Admin panel disabled: it needs [database] path to be set");
        }
        _ => {}
    }

    let greeter = bot.clone();
    let plain_messages =
        Filter::categories([UpdateCategory::Message]).and(|update: &Update| !is_command(update));
    registry.on_filtered(plain_messages, move |update: Arc<Update>| {
        let bot = greeter.clone();
        async move { greet(&bot, &update).await }
    });

    registry
}

async fn greet(bot: &Bot, update: &Update) -> Result<()> {
    let Some(user) = update.message().and_then(|msg| msg.from_user.as_ref()) else {
        return Ok(());
    };

    let name = user.first_name.as_deref().unwrap_or("there");
    bot.request(&SendMessage::new(user.id, format!("Hi {}", name)))
        .await
        .with_context(|| format!("Failed to greet user {}", user.id))?;
    Ok(())
}
