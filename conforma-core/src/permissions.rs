//! Static role/resource/action permission table.
//!
//! This is a flat authorization table, not a policy engine: no
//! inheritance, no dynamic rule evaluation. A (role, resource, action)
//! triple is either in the table or it is not.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::tenant::TenantContext;

/// Per-tenant role, stored on the membership record.
///
/// The global super-admin flag lives on the user record and is only
/// honored on admin-scoped routes; it grants nothing here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Auditor,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Auditor, Role::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Auditor => "auditor",
            Role::Viewer => "viewer",
        }
    }
}

/// Everything a permission check can be about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Audit,
    Finding,
    Nonconformity,
    ActionPlan,
    Risk,
    Document,
    Supplier,
    Policy,
    Indicator,
    Incident,
    Project,
    Member,
    Settings,
}

impl Resource {
    pub const ALL: [Resource; 13] = [
        Resource::Audit,
        Resource::Finding,
        Resource::Nonconformity,
        Resource::ActionPlan,
        Resource::Risk,
        Resource::Document,
        Resource::Supplier,
        Resource::Policy,
        Resource::Indicator,
        Resource::Incident,
        Resource::Project,
        Resource::Member,
        Resource::Settings,
    ];

    /// True for the day-to-day quality records (as opposed to the
    /// tenant's own administration surface).
    fn is_operational(&self) -> bool {
        !matches!(self, Resource::Member | Resource::Settings)
    }

    /// The subset auditors may write to.
    fn is_audit_trail(&self) -> bool {
        matches!(
            self,
            Resource::Audit | Resource::Finding | Resource::Nonconformity
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    /// Administrative control of the resource (member roles, settings).
    Manage,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Manage,
    ];
}

/// The static table. Every allow/deny decision in Conforma goes
/// through this one function.
pub fn allows(role: Role, resource: Resource, action: Action) -> bool {
    match (role, action) {
        // Admins hold every permission inside their tenant.
        (Role::Admin, _) => true,

        // Every member can read everything in their tenant.
        (_, Action::Read) => true,

        // Managers run the operational records but do not manage
        // membership or tenant settings.
        (Role::Manager, Action::Create | Action::Update | Action::Delete) => {
            resource.is_operational()
        }
        (Role::Manager, Action::Manage) => false,

        // Auditors write only to the audit trail, and never delete.
        (Role::Auditor, Action::Create | Action::Update) => resource.is_audit_trail(),
        (Role::Auditor, Action::Delete | Action::Manage) => false,

        // Viewers are read-only.
        (Role::Viewer, _) => false,
    }
}

/// No-op when the combination is allowed, Forbidden otherwise.
pub fn require_permission(ctx: &TenantContext, resource: Resource, action: Action) -> Result<()> {
    if allows(ctx.role, resource, action) {
        return Ok(());
    }
    Err(Error::forbidden(format!(
        "role '{}' may not {:?} {:?}",
        ctx.role.as_str(),
        action,
        resource
    ))
    .into_anyhow())
}
