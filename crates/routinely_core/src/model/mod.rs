//! Domain model for routines, todos and their scheduling metadata.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the persisted JSON shape in one place.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Routines form a tree; todos reference routines and parent todos by id.

pub mod routine;
pub mod schedule;
pub mod todo;
