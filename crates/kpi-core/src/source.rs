//! Record source trait.
//!
//! A [`RecordSource`] is the boundary to whatever fetches client spreadsheets
//! and ad-platform exports. The engine only consumes what sources return.

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{ClientId, DailyEntry, RawRecord},
};

/// Source of raw client data.
///
/// Implementations may read from spreadsheets, exports, or memory.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns the unique name of this source (e.g., "sheets", "memory").
    fn name(&self) -> &str;

    /// Fetches a client's periodic rows. Row order is not significant.
    ///
    /// Returns [`KpiError::ClientNotFound`](crate::KpiError::ClientNotFound)
    /// if the source holds nothing for this client.
    async fn fetch_periods(&self, client: &ClientId) -> Result<Vec<RawRecord>>;

    /// Fetches a client's daily ad-platform series, oldest first.
    async fn fetch_daily(&self, client: &ClientId) -> Result<Vec<DailyEntry>>;
}
