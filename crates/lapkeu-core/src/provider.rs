//! Quote provider trait for per-entity price lookups.
//!
//! Quote extraction is deliberately hidden behind a narrow interface so the
//! lookup strategy (and its brittle markup scraping) can be swapped without
//! touching pipeline logic. Providers are treated as unreliable external
//! collaborators: a failed lookup is an `Err` for that one entity, and
//! retries or backoff are at the caller's discretion.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::Result;
use crate::types::EntityCode;

/// Provider of latest stock prices keyed by entity code.
#[async_trait]
pub trait QuoteProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g. "Google Finance").
    fn name(&self) -> &str;

    /// Fetches the latest closing price for one entity, in whole rupiah.
    ///
    /// Must observe a bounded per-call timeout so one hung lookup cannot
    /// stall a batch.
    async fn fetch_quote(&self, entity: &EntityCode) -> Result<i64>;
}
