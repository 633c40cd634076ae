use std::sync::Arc;

use crate::applications::listing::ApplicationListing;
use crate::applications::store::ApplicationStore;
use crate::cache::CacheStore;
use crate::security::admin_gate::AdminGate;
use crate::security::form_token::FormTokens;
use crate::storage::UploadStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub applications: Arc<dyn ApplicationStore>,
    pub uploads: Arc<dyn UploadStore>,
    /// Redis when configured, otherwise an in-process cache.
    pub cache: Arc<dyn CacheStore>,
    pub tokens: FormTokens,
    pub admin: Arc<dyn AdminGate>,
    /// Origin prefixed to form URLs; empty means same-origin.
    pub public_base_url: String,
}

impl AppState {
    pub fn listing(&self) -> ApplicationListing<'_> {
        ApplicationListing::new(self.applications.as_ref(), self.cache.as_ref())
    }
}
