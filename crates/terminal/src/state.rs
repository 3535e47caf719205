//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use countertop_register::{FileStore, RegisterSession, StoreError};

use crate::backoffice::BackofficeClient;
use crate::config::TerminalConfig;
use crate::search::SearchDispatcher;

/// Error initializing the application state.
#[derive(Debug, Error)]
pub enum StateInitError {
    #[error("failed to open register state: {0}")]
    Store(#[from] StoreError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The register session sits behind an async
/// mutex: register mutations are single-writer by design, matching the one
/// logical thread of control the cart semantics assume.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: TerminalConfig,
    session: Mutex<RegisterSession<FileStore>>,
    backoffice: BackofficeClient,
    search: SearchDispatcher,
}

impl AppState {
    /// Create a new application state, restoring register state from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be opened.
    pub fn new(config: TerminalConfig) -> Result<Self, StateInitError> {
        let store = FileStore::open(&config.state_dir)?;
        let session = RegisterSession::open(store, config.tax_rate)?;
        let backoffice = BackofficeClient::new(&config.backoffice);
        let search = SearchDispatcher::new(config.search_debounce);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session: Mutex::new(session),
                backoffice,
                search,
            }),
        })
    }

    /// Get a reference to the terminal configuration.
    #[must_use]
    pub fn config(&self) -> &TerminalConfig {
        &self.inner.config
    }

    /// Get the register session mutex.
    #[must_use]
    pub fn session(&self) -> &Mutex<RegisterSession<FileStore>> {
        &self.inner.session
    }

    /// Get a reference to the back-office API client.
    #[must_use]
    pub fn backoffice(&self) -> &BackofficeClient {
        &self.inner.backoffice
    }

    /// Get a reference to the search dispatcher.
    #[must_use]
    pub fn search(&self) -> &SearchDispatcher {
        &self.inner.search
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use countertop_register::default_tax_rate;

    use super::*;
    use crate::config::{BackofficeConfig, TerminalConfig};

    fn test_config(state_dir: std::path::PathBuf) -> TerminalConfig {
        TerminalConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            state_dir,
            tax_rate: default_tax_rate(),
            search_debounce: Duration::from_millis(300),
            backoffice: BackofficeConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                api_token: SecretString::from("token"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_state_opens_fresh_register() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(test_config(dir.path().to_path_buf())).unwrap();

        let session = state.session().try_lock().unwrap();
        assert!(session.cart().is_empty());
        assert!(session.saved_carts().is_empty());
    }

    #[test]
    fn test_state_creates_missing_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("registers").join("front");
        let state = AppState::new(test_config(nested.clone())).unwrap();

        assert!(nested.is_dir());
        assert_eq!(state.config().state_dir, nested);
    }
}
