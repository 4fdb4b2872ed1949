//! conforma-store: storage abstraction for Conforma.
//!
//! A document `Store` trait with an atomic write-batch primitive,
//! an in-memory adapter, and the tenant-scoped handle route handlers
//! query through. A relational backend plugs in at the same seam.

pub mod memory;
pub mod scoped;
pub mod store;

pub use memory::MemStore;
pub use scoped::ScopedDb;
pub use store::{Filter, Guard, Store, WriteBatch, WriteOp};
