//! Routine tree use-case service.
//!
//! # Responsibility
//! - Validate routine names and parents above the repository layer.
//! - Provide create, rename, delete and list operations over the tree.
//!
//! # Invariants
//! - Parent routine must exist when provided.
//! - Deleting a routine removes its subtree and every todo that referenced a
//!   removed routine.
//! - Deletion writes todos before routines. A failed second write leaves
//!   routines without todos, never todos pointing at missing routines.

use crate::model::routine::{Routine, RoutineId};
use crate::model::todo::TodoId;
use crate::repo::planner_repo::{PlannerRepository, RepoError};
use crate::service::{load_routines_or_default, save_routines_logged, save_todos_logged};
use crate::tree::{self, RoutineOption};
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from routine service operations.
#[derive(Debug)]
pub enum RoutineServiceError {
    /// Name is blank after trim.
    InvalidName,
    /// Target routine does not exist.
    RoutineNotFound(RoutineId),
    /// Parent routine does not exist.
    ParentNotFound(RoutineId),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for RoutineServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "routine name must not be blank"),
            Self::RoutineNotFound(id) => write!(f, "routine not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent routine not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RoutineServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RoutineServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Ids removed by one routine deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutineDeletion {
    /// Deleted routine followed by its descendants, depth-first.
    pub routine_ids: Vec<RoutineId>,
    pub todo_ids: Vec<TodoId>,
}

/// Routine tree service facade.
pub struct RoutineService<R: PlannerRepository> {
    repo: R,
}

impl<R: PlannerRepository> RoutineService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the stored routine tree, or an empty tree when unreadable.
    pub fn list_routines(&self) -> Vec<Routine> {
        load_routines_or_default(&self.repo)
    }

    /// Returns every routine depth-first with its nesting level.
    pub fn routine_options(&self) -> Vec<RoutineOption> {
        tree::routine_options(&self.list_routines())
    }

    pub fn find_routine(&self, id: RoutineId) -> Option<Routine> {
        tree::find_routine(&self.list_routines(), id).cloned()
    }

    /// Creates one routine under an optional parent.
    pub fn create_routine(
        &self,
        parent_id: Option<RoutineId>,
        name: impl Into<String>,
    ) -> Result<Routine, RoutineServiceError> {
        let name = normalize_name(name.into())?;
        let mut routines = self.repo.load_routines()?;

        if let Some(parent_id) = parent_id.filter(|id| !tree::contains_routine(&routines, *id)) {
            return Err(RoutineServiceError::ParentNotFound(parent_id));
        }

        let routine = Routine::new(name);
        tree::insert_routine(&mut routines, parent_id, routine.clone());
        save_routines_logged(&self.repo, &routines)?;

        info!(
            "event=routine_create module=service status=ok routine_id={} nested={}",
            routine.id,
            parent_id.is_some()
        );
        Ok(routine)
    }

    /// Renames one routine.
    pub fn rename_routine(
        &self,
        id: RoutineId,
        name: impl Into<String>,
    ) -> Result<(), RoutineServiceError> {
        let name = normalize_name(name.into())?;
        let mut routines = self.repo.load_routines()?;
        if !tree::rename_routine(&mut routines, id, &name) {
            return Err(RoutineServiceError::RoutineNotFound(id));
        }
        save_routines_logged(&self.repo, &routines)?;
        Ok(())
    }

    /// Deletes one routine, its descendants and their todos.
    pub fn delete_routine(&self, id: RoutineId) -> Result<RoutineDeletion, RoutineServiceError> {
        let mut routines = self.repo.load_routines()?;
        let todos = self.repo.load_todos()?;

        let removed =
            tree::remove_routine(&mut routines, id).ok_or(RoutineServiceError::RoutineNotFound(id))?;
        let routine_ids = tree::subtree_ids(&removed);
        let doomed: HashSet<RoutineId> = routine_ids.iter().copied().collect();

        let (dropped, kept): (Vec<_>, Vec<_>) = todos
            .into_iter()
            .partition(|todo| todo.routine_id.map_or(false, |rid| doomed.contains(&rid)));

        if !dropped.is_empty() {
            save_todos_logged(&self.repo, &kept)?;
        }
        save_routines_logged(&self.repo, &routines)?;

        info!(
            "event=routine_delete module=service status=ok routine_id={} routines_removed={} todos_removed={}",
            id,
            routine_ids.len(),
            dropped.len()
        );
        Ok(RoutineDeletion {
            routine_ids,
            todo_ids: dropped.into_iter().map(|todo| todo.id).collect(),
        })
    }
}

fn normalize_name(value: String) -> Result<String, RoutineServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RoutineServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
