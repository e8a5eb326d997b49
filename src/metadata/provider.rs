//! Trait definition for metadata providers.
//!
//! Every data source (remote JSON endpoints, local record directories, ...)
//! implements [`MetadataProvider`]. Providers hand back already-parsed
//! [`VideoRecord`]s; the metadata core only orchestrates and merges them.

use async_trait::async_trait;
use javscraper_common::VideoRecord;
use tokio_util::sync::CancellationToken;

/// Async trait that all metadata providers must implement.
///
/// Providers are constructed once by the
/// [`ProviderRegistry`](super::registry::ProviderRegistry) and shared behind an
/// `Arc` for the lifetime of the process, so implementations must not rely on
/// mutable state between calls.
///
/// Both operations receive a [`CancellationToken`]. Honoring it is
/// cooperative; the dispatcher additionally enforces a hard deadline so a
/// provider that ignores it cannot stall a search.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Unique name for this provider (e.g. `"javbus"`).
    ///
    /// Names are persisted inside reference tokens, so they must stay stable
    /// across restarts.
    fn name(&self) -> &str;

    /// Search for records matching `key`.
    ///
    /// Results are returned in the provider's own relevance order.
    async fn search(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<VideoRecord>>;

    /// Fetch one record by its provider-specific lookup key.
    ///
    /// Returns `Ok(None)` when the provider no longer has the record.
    async fn fetch(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Option<VideoRecord>>;
}
