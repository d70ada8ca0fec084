//! Dashboard preferences and the store trait that persists them.
//!
//! Preferences are an injected configuration object. The engine reads the
//! recognized keys below; anything else in a stored document is ignored.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::{KpiError, Result},
    metric::Metric,
    period::{AdWindow, TrailingWindow},
    summary::DEFAULT_TILES,
    table::{SortKey, SortSpec, TableRequest},
    types::ClientId,
    window::InProgress,
};

/// Per-client dashboard preferences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardPreferences {
    /// KPI tiles to show, in order.
    pub visible_tiles: Vec<Metric>,
    /// Table columns, in order. Empty means the host's default layout.
    pub column_order: Vec<SortKey>,
    /// Trailing window for tables and trend charts.
    pub time_range: TrailingWindow,
    /// Window for ad-platform tiles.
    pub ad_window: AdWindow,
    /// Table sort order; newest first when absent.
    pub table_sort: Option<SortSpec>,
    /// Drop the current calendar month from trend windows.
    pub exclude_current_period: bool,
}

impl Default for DashboardPreferences {
    fn default() -> Self {
        Self {
            visible_tiles: DEFAULT_TILES.to_vec(),
            column_order: Vec::new(),
            time_range: TrailingWindow::default(),
            ad_window: AdWindow::default(),
            table_sort: None,
            exclude_current_period: true,
        }
    }
}

impl DashboardPreferences {
    /// Parses preferences from a JSON document.
    ///
    /// Missing keys take their defaults and unrecognized keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`KpiError::Parse`] for malformed JSON or an invalid value
    /// under a recognized key (for example a 5-month time range).
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| KpiError::Parse(e.to_string()))
    }

    /// Serializes preferences to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`KpiError::Other`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| KpiError::Other(e.to_string()))
    }

    /// The table request these preferences describe.
    #[must_use]
    pub fn table_request(&self) -> TableRequest {
        let request = TableRequest::new(self.time_range.months());
        match self.table_sort {
            Some(sort) => request.with_sort(sort),
            None => request,
        }
    }

    /// The in-progress policy for trend windows, using the wall clock.
    #[must_use]
    pub fn in_progress(&self) -> InProgress {
        if self.exclude_current_period {
            InProgress::current()
        } else {
            InProgress::Include
        }
    }
}

/// Storage for per-client preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Loads a client's preferences.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    async fn get(&self, client: &ClientId) -> Result<Option<DashboardPreferences>>;

    /// Stores a client's preferences, replacing any previous value.
    async fn put(&self, client: &ClientId, preferences: &DashboardPreferences) -> Result<()>;

    /// Removes a client's preferences.
    async fn remove(&self, client: &ClientId) -> Result<()>;

    /// Removes all stored preferences.
    async fn clear(&self) -> Result<()>;
}
