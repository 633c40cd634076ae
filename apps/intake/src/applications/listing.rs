use std::time::Duration;

use tracing::{debug, warn};

use crate::applications::store::ApplicationStore;
use crate::cache::CacheStore;
use crate::models::application::ApplicationRecord;

pub const LISTING_CACHE_KEY: &str = "job_applications_submissions";
pub const LISTING_TTL: Duration = Duration::from_secs(300);

/// All applications, newest first, served from a short-lived snapshot.
///
/// The cache is best-effort: any cache failure falls through to storage.
pub struct ApplicationListing<'a> {
    store: &'a dyn ApplicationStore,
    cache: &'a dyn CacheStore,
}

impl<'a> ApplicationListing<'a> {
    pub fn new(store: &'a dyn ApplicationStore, cache: &'a dyn CacheStore) -> Self {
        Self { store, cache }
    }

    pub async fn list(&self) -> Result<Vec<ApplicationRecord>, sqlx::Error> {
        if let Some(records) = self.cached().await {
            return Ok(records);
        }

        debug!("Listing cache miss; reading job_applications");
        let records = self.store.list_newest_first().await?;

        match serde_json::to_string(&records) {
            Ok(snapshot) => {
                if let Err(e) = self.cache.set(LISTING_CACHE_KEY, snapshot, LISTING_TTL).await {
                    warn!("Failed to populate listing cache: {e}");
                }
            }
            Err(e) => warn!("Failed to serialize listing snapshot: {e}"),
        }

        Ok(records)
    }

    pub async fn invalidate(&self) {
        match self.cache.delete(LISTING_CACHE_KEY).await {
            Ok(()) => debug!("Listing cache invalidated"),
            Err(e) => warn!("Failed to invalidate listing cache: {e}"),
        }
    }

    async fn cached(&self) -> Option<Vec<ApplicationRecord>> {
        let snapshot = match self.cache.get(LISTING_CACHE_KEY).await {
            Ok(snapshot) => snapshot?,
            Err(e) => {
                warn!("Listing cache unavailable: {e}");
                return None;
            }
        };
        match serde_json::from_str(&snapshot) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("Discarding undecodable listing snapshot: {e}");
                None
            }
        }
    }
}
