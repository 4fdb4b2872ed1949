use std::sync::Arc;

use conforma_auth::SessionTokens;
use conforma_store::Store;

/// Collection names, shared by handlers and tests.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TENANTS: &str = "tenants";
    pub const MEMBERSHIPS: &str = "memberships";
    pub const SUBSCRIPTIONS: &str = "subscriptions";
    pub const RISKS: &str = "risks";
    pub const NONCONFORMITIES: &str = "nonconformities";
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: SessionTokens,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: SessionTokens) -> Self {
        Self { store, tokens }
    }
}
