//! Wordpool Server
//!
//! HTTP front end for the word-puzzle game: loads the dictionary, opens the
//! store, and serves students, puzzles, submissions and the leaderboard.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod service;

use config::ServerConfig;
use handlers::{create_router, AppState};
use service::GameService;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wordpool_domain::{Dictionary, DictionaryError};
use wordpool_store::{SqliteStore, StoreError};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Word list could not be loaded
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Database could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `default_level` when set. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load the dictionary and open the store described by `config`
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let dictionary = Dictionary::load(&config.dictionary_path)?;
    info!(
        "Loaded {} words from {}",
        dictionary.len(),
        config.dictionary_path
    );

    let store = SqliteStore::new(&config.database_path)?;
    info!("Opened database at {}", config.database_path);

    let service = GameService::new(
        store,
        Arc::new(dictionary),
        config.leaderboard_cache_ttl(),
    );

    Ok(AppState {
        service: Arc::new(service),
    })
}

/// Start the HTTP server
///
/// Initializes tracing, builds the application state, and serves until
/// the listener fails.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing(&config.log_level);

    info!("Starting Wordpool server");
    info!("Bind address: {}", config.bind_addr());
    info!(
        "Leaderboard cache TTL: {} seconds",
        config.leaderboard_cache_ttl_secs
    );

    let state = build_state(&config)?;
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_missing_dictionary() {
        let config = ServerConfig {
            dictionary_path: "/definitely/not/words.json".to_string(),
            database_path: ":memory:".to_string(),
            ..ServerConfig::default()
        };

        assert!(matches!(
            build_state(&config),
            Err(ServerError::Dictionary(DictionaryError::Io { .. }))
        ));
    }

    #[test]
    fn test_build_state_with_shipped_word_list() {
        let config = ServerConfig {
            dictionary_path: concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/words.json").to_string(),
            database_path: ":memory:".to_string(),
            ..ServerConfig::default()
        };

        let state = build_state(&config).unwrap();
        assert!(state.service.dictionary().contains("fox"));
    }
}
