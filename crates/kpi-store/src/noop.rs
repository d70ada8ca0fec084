//! No-op preference store.

use async_trait::async_trait;
use kpi_core::{ClientId, DashboardPreferences, PreferenceStore, Result};
use tracing::trace;

/// A preference store that doesn't store anything.
///
/// `get` always returns `Ok(None)`, so every client sees default preferences.
/// Writes succeed and are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl NoopStore {
    /// Create a new no-op store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PreferenceStore for NoopStore {
    async fn get(&self, _client: &ClientId) -> Result<Option<DashboardPreferences>> {
        trace!("NoopStore: get called, returning None");
        Ok(None)
    }

    async fn put(&self, _client: &ClientId, _preferences: &DashboardPreferences) -> Result<()> {
        trace!("NoopStore: put called, doing nothing");
        Ok(())
    }

    async fn remove(&self, _client: &ClientId) -> Result<()> {
        trace!("NoopStore: remove called, doing nothing");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        trace!("NoopStore: clear called, doing nothing");
        Ok(())
    }
}
