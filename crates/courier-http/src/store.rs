//! Holder for the active dispatch configuration

use std::{sync::Arc, time::Duration};

use parking_lot::RwLock;
use tracing::debug;

use crate::{
    config::DispatchConfig,
    error::{HttpError, Result},
    progress::ProgressIndicator,
};

/// The single point of truth for dispatch settings
///
/// Owned by the application (usually behind an `Arc`) and read by every
/// dispatcher. Readers take a snapshot, so replacing the configuration
/// never affects an attempt that is already in flight.
#[derive(Debug, Default)]
pub struct ConfigStore {
    current: RwLock<Option<Arc<DispatchConfig>>>,
}

impl ConfigStore {
    /// An empty store; reads fail until [`ConfigStore::initialize`]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store initialized with `config`
    pub fn with_config(config: DispatchConfig) -> Self {
        let store = Self::new();
        store.initialize(config);
        store
    }

    /// Install `config`, replacing any previous one
    pub fn initialize(&self, config: DispatchConfig) {
        debug!(timeout = ?config.timeout(), "dispatch configuration initialized");
        *self.current.write() = Some(Arc::new(config));
    }

    /// Swap the access token, keeping every other setting
    pub fn update_access_token(&self, token: impl Into<String>) -> Result<()> {
        let mut current = self.current.write();
        let updated = current
            .as_ref()
            .ok_or(HttpError::NotConfigured)?
            .with_access_token(token);
        *current = Some(Arc::new(updated));
        debug!("access token updated");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.current.read().is_some()
    }

    /// Snapshot of the active configuration
    pub fn current(&self) -> Result<Arc<DispatchConfig>> {
        self.current.read().clone().ok_or(HttpError::NotConfigured)
    }

    pub fn token(&self) -> Result<String> {
        Ok(self.current()?.token().to_string())
    }

    pub fn timeout(&self) -> Result<Duration> {
        Ok(self.current()?.timeout())
    }

    pub fn progress(&self) -> Result<Option<Arc<dyn ProgressIndicator>>> {
        Ok(self.current()?.progress())
    }
}
