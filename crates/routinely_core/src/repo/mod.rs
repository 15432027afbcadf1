//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite and JSON details from service orchestration.
//!
//! # Invariants
//! - Collections are read and written whole; there are no partial updates.
//! - Repository APIs return semantic errors in addition to DB transport
//!   errors.

pub mod kv_repo;
pub mod planner_repo;
