//! conforma-server: the Conforma HTTP API.
//!
//! Route handlers follow one shape: resolve the request context,
//! check the permission table, validate the payload, query through
//! the tenant-scoped handle, respond with the JSON envelope.

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod context;
pub mod error;
pub mod routes;
pub mod state;
pub mod validate;

pub use app::{build_router, listen};
pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;
