//! conforma-core: framework-agnostic core for Conforma.
//!
//! Everything a transport or storage adapter needs to speak the
//! Conforma domain: the structured error model, tenant context,
//! the static permission table, risk scoring, code generation and
//! pagination envelopes.

pub mod codes;
pub mod errors;
pub mod pagination;
pub mod permissions;
pub mod records;
pub mod risk;
pub mod tenant;

pub use codes::sequential_code;
pub use errors::{Error, ErrorKind};
pub use pagination::{PageQuery, Paginated};
pub use permissions::{require_permission, Action, Resource, Role};
pub use records::{
    Membership, Nonconformity, NonconformityStatus, Plan, Risk, RiskStatus, Subscription,
    SubscriptionStatus, Tenant, User,
};
pub use risk::{risk_level, RiskLevel};
pub use tenant::{TenantContext, TenantId};
