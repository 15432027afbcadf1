//! Recursive helpers over the routine tree.
//!
//! # Responsibility
//! - Find, insert, rename and remove routines at any depth.
//! - Flatten the tree into depth-annotated options for pickers and list
//!   grouping.
//!
//! # Invariants
//! - Traversal order is depth-first, parents before children, siblings in
//!   stored order.
//! - Removing a routine removes its whole subtree.

use crate::model::routine::{Routine, RoutineId};

/// One routine in depth-first order with its nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineOption {
    pub id: RoutineId,
    pub name: String,
    /// 0 for top-level routines.
    pub level: usize,
}

/// Finds a routine anywhere in the tree.
pub fn find_routine(routines: &[Routine], id: RoutineId) -> Option<&Routine> {
    for routine in routines {
        if routine.id == id {
            return Some(routine);
        }
        if let Some(found) = find_routine(&routine.children, id) {
            return Some(found);
        }
    }
    None
}

/// Mutable variant of [`find_routine`].
pub fn find_routine_mut(routines: &mut [Routine], id: RoutineId) -> Option<&mut Routine> {
    for routine in routines.iter_mut() {
        if routine.id == id {
            return Some(routine);
        }
        if let Some(found) = find_routine_mut(&mut routine.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn contains_routine(routines: &[Routine], id: RoutineId) -> bool {
    find_routine(routines, id).is_some()
}

/// Appends `routine` under `parent_id`, or at the top level when `None`.
///
/// Returns `false` when the parent does not exist; the tree is unchanged.
pub fn insert_routine(
    routines: &mut Vec<Routine>,
    parent_id: Option<RoutineId>,
    routine: Routine,
) -> bool {
    match parent_id {
        None => {
            routines.push(routine);
            true
        }
        Some(parent_id) => match find_routine_mut(routines, parent_id) {
            Some(parent) => {
                parent.children.push(routine);
                true
            }
            None => false,
        },
    }
}

/// Renames one routine. Returns `false` when it does not exist.
pub fn rename_routine(routines: &mut [Routine], id: RoutineId, name: &str) -> bool {
    match find_routine_mut(routines, id) {
        Some(routine) => {
            routine.name = name.to_string();
            true
        }
        None => false,
    }
}

/// Detaches one routine with its subtree.
pub fn remove_routine(routines: &mut Vec<Routine>, id: RoutineId) -> Option<Routine> {
    if let Some(index) = routines.iter().position(|routine| routine.id == id) {
        return Some(routines.remove(index));
    }
    routines
        .iter_mut()
        .find_map(|routine| remove_routine(&mut routine.children, id))
}

/// Ids of `routine` and every descendant, depth-first.
pub fn subtree_ids(routine: &Routine) -> Vec<RoutineId> {
    let mut ids = vec![routine.id];
    for child in &routine.children {
        ids.extend(subtree_ids(child));
    }
    ids
}

/// Flattens the tree into depth-annotated options.
pub fn routine_options(routines: &[Routine]) -> Vec<RoutineOption> {
    let mut options = Vec::new();
    push_options(routines, 0, &mut options);
    options
}

fn push_options(routines: &[Routine], level: usize, out: &mut Vec<RoutineOption>) {
    for routine in routines {
        out.push(RoutineOption {
            id: routine.id,
            name: routine.name.clone(),
            level,
        });
        push_options(&routine.children, level + 1, out);
    }
}
