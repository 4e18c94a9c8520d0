//! # Settings State
//!
//! Store settings plus the unsaved-changes flag.
//!
//! ## Thread Safety
//! Uses `tokio::sync::Mutex` because saving holds the lock across the
//! simulated save delay; a second save waits for the first.

use std::sync::Arc;

use melatea_core::settings::{Settings, SettingsStore};
use tokio::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct SettingsState {
    store: Arc<Mutex<SettingsStore>>,
}

impl SettingsState {
    pub fn new(settings: Settings) -> Self {
        SettingsState {
            store: Arc::new(Mutex::new(SettingsStore::new(settings))),
        }
    }

    /// Copy of the current settings.
    pub async fn snapshot(&self) -> Settings {
        self.store.lock().await.settings().clone()
    }

    pub async fn lock(&self) -> MutexGuard<'_, SettingsStore> {
        self.store.lock().await
    }
}
