//! In-memory source and preference store.

use async_trait::async_trait;
use kpi_core::{
    ClientId, DailyEntry, DashboardPreferences, KpiError, PreferenceStore, RawRecord,
    RecordSource, Result,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Record source serving rows already held in memory.
///
/// Useful when a host has pre-fetched spreadsheet data, and for tests.
#[derive(Debug)]
pub struct InMemorySource {
    name: String,
    periods: RwLock<HashMap<ClientId, Vec<RawRecord>>>,
    daily: RwLock<HashMap<ClientId, Vec<DailyEntry>>>,
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl InMemorySource {
    /// Create an empty source with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            periods: RwLock::default(),
            daily: RwLock::default(),
        }
    }

    /// Replace a client's periodic rows.
    pub async fn insert_periods(&self, client: ClientId, rows: Vec<RawRecord>) {
        debug!(client = %client, rows = rows.len(), "Storing period rows");
        self.periods.write().await.insert(client, rows);
    }

    /// Replace a client's daily series.
    pub async fn insert_daily(&self, client: ClientId, entries: Vec<DailyEntry>) {
        debug!(client = %client, entries = entries.len(), "Storing daily entries");
        self.daily.write().await.insert(client, entries);
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(source = %self.name, client = %client))]
    async fn fetch_periods(&self, client: &ClientId) -> Result<Vec<RawRecord>> {
        self.periods
            .read()
            .await
            .get(client)
            .cloned()
            .ok_or_else(|| KpiError::ClientNotFound(client.to_string()))
    }

    /// A client without daily data yields an empty series.
    #[instrument(skip(self), fields(source = %self.name, client = %client))]
    async fn fetch_daily(&self, client: &ClientId) -> Result<Vec<DailyEntry>> {
        Ok(self
            .daily
            .read()
            .await
            .get(client)
            .cloned()
            .unwrap_or_default())
    }
}

/// Simple in-memory preference store.
///
/// Preferences live in a `RwLock`-protected `HashMap` and are lost when the
/// store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    preferences: RwLock<HashMap<ClientId, DashboardPreferences>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryStore {
    #[instrument(skip(self), fields(client = %client))]
    async fn get(&self, client: &ClientId) -> Result<Option<DashboardPreferences>> {
        let preferences = self.preferences.read().await;
        match preferences.get(client) {
            Some(found) => {
                debug!("Preferences hit");
                Ok(Some(found.clone()))
            }
            None => {
                debug!("Preferences miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, preferences), fields(client = %client))]
    async fn put(&self, client: &ClientId, preferences: &DashboardPreferences) -> Result<()> {
        self.preferences
            .write()
            .await
            .insert(client.clone(), preferences.clone());
        debug!("Stored preferences");
        Ok(())
    }

    #[instrument(skip(self), fields(client = %client))]
    async fn remove(&self, client: &ClientId) -> Result<()> {
        self.preferences.write().await.remove(client);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut preferences = self.preferences.write().await;
        let removed = preferences.len();
        preferences.clear();
        debug!("Cleared {} stored preference sets", removed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kpi_core::TrailingWindow;

    #[tokio::test]
    async fn test_source_periods() {
        let source = InMemorySource::default();
        let client = ClientId::new("acme");

        let missing = source.fetch_periods(&client).await;
        assert!(matches!(missing, Err(KpiError::ClientNotFound(_))));

        let rows = vec![RawRecord::new("January 2024").with_field("Revenue", 100)];
        source.insert_periods(client.clone(), rows.clone()).await;
        assert_eq!(source.fetch_periods(&client).await.unwrap(), rows);
        assert_eq!(source.name(), "memory");
    }

    #[tokio::test]
    async fn test_source_daily_defaults_to_empty() {
        let source = InMemorySource::new("sheets");
        let client = ClientId::new("acme");
        assert!(source.fetch_daily(&client).await.unwrap().is_empty());

        let day = DailyEntry::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        source.insert_daily(client.clone(), vec![day.clone()]).await;
        assert_eq!(source.fetch_daily(&client).await.unwrap(), vec![day]);
    }

    #[tokio::test]
    async fn test_store_put_get_remove() {
        let store = InMemoryStore::new();
        let client = ClientId::new("acme");
        assert!(store.get(&client).await.unwrap().is_none());

        let prefs = DashboardPreferences {
            time_range: TrailingWindow::Three,
            ..Default::default()
        };
        store.put(&client, &prefs).await.unwrap();
        assert_eq!(store.get(&client).await.unwrap(), Some(prefs));

        store.remove(&client).await.unwrap();
        assert!(store.get(&client).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_clear() {
        let store = InMemoryStore::new();
        let prefs = DashboardPreferences::default();
        store.put(&ClientId::new("a"), &prefs).await.unwrap();
        store.put(&ClientId::new("b"), &prefs).await.unwrap();

        store.clear().await.unwrap();

        assert!(store.get(&ClientId::new("a")).await.unwrap().is_none());
        assert!(store.get(&ClientId::new("b")).await.unwrap().is_none());
    }
}
