//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep host/UI layers decoupled from storage details.
//!
//! # Invariants
//! - Every mutation reads the collections whole, mutates in memory and writes
//!   the changed collections whole before returning.
//! - Read-only views fall back to empty collections on storage failure.
//!   Mutations propagate load failures so unreadable data is never
//!   overwritten.

pub mod routine_service;
pub mod todo_service;

use crate::model::routine::Routine;
use crate::model::todo::Todo;
use crate::repo::planner_repo::{PlannerRepository, RepoResult};
use log::{error, warn};

/// Loads the routine tree, logging and returning an empty tree on failure.
pub fn load_routines_or_default<R: PlannerRepository>(repo: &R) -> Vec<Routine> {
    repo.load_routines().unwrap_or_else(|err| {
        warn!(
            "event=storage_load module=service status=fallback collection=routines error={}",
            err
        );
        Vec::new()
    })
}

/// Loads the todo list, logging and returning an empty list on failure.
pub fn load_todos_or_default<R: PlannerRepository>(repo: &R) -> Vec<Todo> {
    repo.load_todos().unwrap_or_else(|err| {
        warn!(
            "event=storage_load module=service status=fallback collection=todos error={}",
            err
        );
        Vec::new()
    })
}

pub(crate) fn save_routines_logged<R: PlannerRepository>(
    repo: &R,
    routines: &[Routine],
) -> RepoResult<()> {
    repo.save_routines(routines).map_err(|err| {
        error!(
            "event=storage_save module=service status=error collection=routines error={}",
            err
        );
        err
    })
}

pub(crate) fn save_todos_logged<R: PlannerRepository>(repo: &R, todos: &[Todo]) -> RepoResult<()> {
    repo.save_todos(todos).map_err(|err| {
        error!(
            "event=storage_save module=service status=error collection=todos error={}",
            err
        );
        err
    })
}
