//! Client dashboard over record sources with fallback.

use std::sync::Arc;

use tracing::{debug, warn};

use kpi_core::{
    AdMetrics, ClientId, DailyEntry, DashboardPreferences, KpiError, KpiSummary, PeriodRecord,
    PreferenceStore, RecordSource, Result, TableRequest, TableRow, TrendView, aggregate_daily,
    compose_table, normalize_series, select_trailing_days, summarize, trend,
};
use kpi_store::InMemoryStore;

/// Dashboard for agency clients.
///
/// The `Dashboard` holds one or more record sources, tried in registration
/// order until one succeeds, and an optional preference store. Every view
/// loads fresh data and runs the engine from scratch, so repeated calls with
/// unchanged inputs return identical results.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use kpi::{ClientId, Dashboard, InMemorySource};
///
/// let source = Arc::new(InMemorySource::new("sheets"));
/// let dashboard = Dashboard::new()
///     .with_source(source)
///     .with_memory_store();
///
/// let summary = dashboard.summary(&ClientId::new("acme-outdoor")).await?;
/// for tile in summary.tiles {
///     println!("{}: {}", tile.metric, tile.current);
/// }
/// ```
#[derive(Default)]
pub struct Dashboard {
    sources: Vec<Arc<dyn RecordSource>>,
    store: Option<Arc<dyn PreferenceStore>>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

impl Dashboard {
    /// Create a new empty dashboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record source. Sources are tried in registration order.
    pub fn register_source(&mut self, source: Arc<dyn RecordSource>) {
        self.sources.push(source);
    }

    /// Set the preference store.
    pub fn set_store(&mut self, store: Arc<dyn PreferenceStore>) {
        self.store = Some(store);
    }

    /// Add a record source.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn RecordSource>) -> Self {
        self.register_source(source);
        self
    }

    /// Use a preference store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.set_store(store);
        self
    }

    /// Use a fresh in-memory preference store.
    #[must_use]
    pub fn with_memory_store(self) -> Self {
        self.with_store(Arc::new(InMemoryStore::new()))
    }

    /// Load and normalize a client's periodic records, trying sources in order.
    pub async fn load_periods(&self, client: &ClientId) -> Result<Vec<PeriodRecord>> {
        if self.sources.is_empty() {
            return Err(KpiError::SourceNotConfigured(
                "No record sources registered".to_string(),
            ));
        }

        let mut last_error = None;
        for source in &self.sources {
            debug!(source = source.name(), client = %client, "Fetching periods");

            match source.fetch_periods(client).await {
                Ok(rows) => return Ok(normalize_series(&rows)),
                Err(e) => {
                    warn!(
                        source = source.name(),
                        error = %e,
                        "Source failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| KpiError::Other("All sources failed with no error".to_string())))
    }

    /// Load a client's daily ad-platform series, trying sources in order.
    pub async fn load_daily(&self, client: &ClientId) -> Result<Vec<DailyEntry>> {
        if self.sources.is_empty() {
            return Err(KpiError::SourceNotConfigured(
                "No record sources registered".to_string(),
            ));
        }

        let mut last_error = None;
        for source in &self.sources {
            debug!(source = source.name(), client = %client, "Fetching daily series");

            match source.fetch_daily(client).await {
                Ok(entries) => return Ok(entries),
                Err(e) => {
                    warn!(
                        source = source.name(),
                        error = %e,
                        "Source failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| KpiError::Other("All sources failed with no error".to_string())))
    }

    /// A client's preferences, or the defaults.
    ///
    /// A failing store is logged and treated as empty; preferences never
    /// block a view from rendering.
    pub async fn preferences(&self, client: &ClientId) -> DashboardPreferences {
        let Some(store) = &self.store else {
            return DashboardPreferences::default();
        };
        match store.get(client).await {
            Ok(Some(preferences)) => preferences,
            Ok(None) => DashboardPreferences::default(),
            Err(e) => {
                warn!(client = %client, error = %e, "Failed to load preferences, using defaults");
                DashboardPreferences::default()
            }
        }
    }

    /// Store a client's preferences.
    pub async fn save_preferences(
        &self,
        client: &ClientId,
        preferences: &DashboardPreferences,
    ) -> Result<()> {
        match &self.store {
            Some(store) => store.put(client, preferences).await,
            None => Err(KpiError::Store(
                "No preference store configured".to_string(),
            )),
        }
    }

    /// KPI tiles for the client's latest period, in preference order.
    pub async fn summary(&self, client: &ClientId) -> Result<KpiSummary> {
        let preferences = self.preferences(client).await;
        let records = self.load_periods(client).await?;
        Ok(summarize(&records, &preferences.visible_tiles))
    }

    /// The preferred trailing window of complete periods and its totals.
    pub async fn trend(&self, client: &ClientId) -> Result<TrendView> {
        let preferences = self.preferences(client).await;
        let records = self.load_periods(client).await?;
        Ok(trend(
            &records,
            preferences.time_range.months(),
            preferences.in_progress(),
        ))
    }

    /// Table rows using the client's preferred window and sort.
    pub async fn table(&self, client: &ClientId) -> Result<Vec<TableRow>> {
        let request = self.preferences(client).await.table_request();
        self.table_with(client, request).await
    }

    /// Table rows for an explicit request.
    pub async fn table_with(
        &self,
        client: &ClientId,
        request: TableRequest,
    ) -> Result<Vec<TableRow>> {
        let records = self.load_periods(client).await?;
        Ok(compose_table(&records, request))
    }

    /// Ad-platform totals over the client's preferred ad window.
    pub async fn ad_overview(&self, client: &ClientId) -> Result<AdMetrics> {
        let window = self.preferences(client).await.ad_window;
        let daily = self.load_daily(client).await?;
        Ok(aggregate_daily(select_trailing_days(&daily, window.days())))
    }
}
