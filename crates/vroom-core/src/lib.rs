//! vroom-core - Core models and storage for the VROOM backend
//!
//! This crate holds everything the HTTP layer needs that is not HTTP:
//! the domain models, the [`VroomStore`] abstraction with its in-memory
//! implementation, and the OBD-II response decoder used by scans.

pub mod error;
pub mod memory;
pub mod models;
pub mod obd;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::*;
pub use store::VroomStore;
