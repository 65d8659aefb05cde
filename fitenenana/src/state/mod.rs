//! Application state
//!
//! Shared by every handler: configuration, the catalogue (or the reason it
//! could not be loaded) and the session store.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalogue::{Catalogue, CatalogueLoader, FailureKind, LoadError};
use crate::config::FitenenanaConfig;
use crate::session::SessionStore;

/// Outcome of the last catalogue load
#[derive(Debug, Clone)]
pub enum CatalogueStatus {
    /// Catalogue loaded and usable
    Ready(Arc<Catalogue>),
    /// Load failed; every screen shows the error screen
    Failed(FailureKind),
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<FitenenanaConfig>,
    loader: Arc<CatalogueLoader>,
    catalogue: Arc<RwLock<CatalogueStatus>>,
    sessions: SessionStore,
}

impl AppState {
    /// Build the state and load the catalogue
    ///
    /// A load failure does not fail initialization; it is recorded as
    /// [`CatalogueStatus::Failed`].
    pub async fn initialize(config: FitenenanaConfig) -> Self {
        let state = Self::with_status(config, CatalogueStatus::Failed(FailureKind::Unavailable));
        // Failure already logged and recorded by reload
        let _ = state.reload().await;
        state
    }

    /// Build the state around an already-loaded catalogue
    #[must_use]
    pub fn with_catalogue(config: FitenenanaConfig, catalogue: Catalogue) -> Self {
        Self::with_status(config, CatalogueStatus::Ready(Arc::new(catalogue)))
    }

    /// Build the state with an explicit catalogue status
    #[must_use]
    pub fn with_status(config: FitenenanaConfig, status: CatalogueStatus) -> Self {
        let loader = CatalogueLoader::new(config.catalogue.source(), config.catalogue.validator());
        let sessions = SessionStore::new(config.session.max_age());

        Self {
            config: Arc::new(config),
            loader: Arc::new(loader),
            catalogue: Arc::new(RwLock::new(status)),
            sessions,
        }
    }

    /// Application configuration
    #[must_use]
    pub fn config(&self) -> &FitenenanaConfig {
        &self.config
    }

    /// Current catalogue status
    #[must_use]
    pub fn catalogue(&self) -> CatalogueStatus {
        self.catalogue.read().clone()
    }

    /// Session store
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Load the catalogue again, replacing the current status
    ///
    /// # Errors
    ///
    /// Returns the load error; the status is then [`CatalogueStatus::Failed`]
    pub async fn reload(&self) -> Result<(), LoadError> {
        match self.loader.load().await {
            Ok(loaded) => {
                *self.catalogue.write() = CatalogueStatus::Ready(loaded.catalogue);
                Ok(())
            }
            Err(err) => {
                *self.catalogue.write() = CatalogueStatus::Failed(err.kind());
                Err(err)
            }
        }
    }
}
