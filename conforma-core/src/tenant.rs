//! Core multi-tenant types for Conforma.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permissions::Role;

/// A tenant identifier. Stable UUID; the URL-facing slug lives on
/// the tenant record and is resolved once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub Uuid);

impl TenantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Context carried with every tenant-scoped operation.
///
/// Produced by the request-context resolver after the acting user's
/// membership in the tenant has been confirmed, so holding one is
/// proof of membership.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: TenantId,
    pub user_id: Uuid,
    pub role: Role,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId, user_id: Uuid, role: Role) -> Self {
        Self {
            tenant_id,
            user_id,
            role,
        }
    }
}
