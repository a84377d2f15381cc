//! parley: terminal front end for the database and document assistants.

mod cli;
mod command;
mod console;
mod repl;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use parley_client::{
    ConversationStore, HttpBackend, HttpBackendConfig, RequestOrchestrator, SessionManager,
};
use parley_common::{EventBus, ParleyError};
use parley_config::ParleyConfig;

use crate::console::ConsoleSink;
use crate::repl::Repl;

fn load_config(args: &cli::Args) -> Result<ParleyConfig, ParleyError> {
    let mut config = match &args.config {
        Some(path) => parley_config::load_config_from(path)?,
        None => parley_config::load_config()?,
    };
    if let Some(url) = &args.backend_url {
        config.backend.base_url = url.clone();
    }
    if let Some(mode) = args.mode {
        config.assistant.mode = mode.into();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), ParleyError> {
    let args = cli::parse();
    let config = load_config(&args)?;
    if args.print_config {
        println!("{}", parley_config::config_to_json(&config));
        return Ok(());
    }

    let log_directive = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_directive());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_directive)),
        )
        .init();

    tracing::info!(
        backend = %config.backend.base_url,
        mode = ?config.assistant.mode,
        "starting parley"
    );

    let backend = HttpBackend::new(
        HttpBackendConfig::new(config.backend.base_url.clone())
            .with_connect_timeout(Duration::from_secs(config.backend.connect_timeout.into())),
    )
    .map_err(|e| ParleyError::Backend(e.to_string()))?;

    let events = EventBus::default();
    tokio::spawn(console::follow_events(events.subscribe()));

    let sink = Arc::new(ConsoleSink::new(config.notifications.capacity as usize));
    let orchestrator = RequestOrchestrator::new(
        Arc::new(backend),
        sink.clone(),
        SessionManager::new(),
        ConversationStore::with_default_suggestions(config.assistant.suggestions.clone()),
    )
    .with_call_timeout(Duration::from_secs(config.backend.request_timeout.into()))
    .with_events(events);

    Repl::new(orchestrator, config.assistant.mode, sink)
        .run()
        .await?;
    tracing::info!("parley shutting down");
    Ok(())
}
