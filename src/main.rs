mod config;
mod engine;
mod intent;
mod intervention;
mod language;
mod response;
mod server;
mod store;
mod wasender;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::engine::ConversationEngine;
use crate::intent::IntentClassifier;
use crate::intervention::InterventionTracker;
use crate::language::LanguageDetector;
use crate::server::AppState;
use crate::store::{InteractionStore, JsonInteractionLog};
use crate::wasender::{Delivery, WasenderClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lexbot=debug".into()),
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
    info!("  Firm: {}", config.firm.name);
    info!("  Wasender endpoint: {}", config.wasender.api_endpoint);
    info!("  Log directory: {}", config.bot.log_dir.display());
    info!("  Cooldown: {} minutes", config.bot.cooldown_minutes);

    // Wire the engine and its collaborators
    let interventions = Arc::new(InterventionTracker::new(config.cooldown()));
    let delivery: Arc<dyn Delivery> = Arc::new(WasenderClient::new(config.wasender.clone())?);
    let store: Arc<dyn InteractionStore> =
        Arc::new(JsonInteractionLog::new(config.bot.log_dir.clone()));

    let engine = Arc::new(ConversationEngine::new(
        config.firm.clone(),
        LanguageDetector::new(config.detection.clone()),
        IntentClassifier::new(config.lexicon.clone()),
        interventions,
        delivery,
        Arc::clone(&store),
    ));

    let state = AppState {
        engine,
        store,
        webhook_secret: config.server.webhook_secret.clone(),
    };

    info!("Responder is starting...");
    server::run(state, &config.server.host, config.server.port).await
}
