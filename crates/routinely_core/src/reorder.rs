//! Flat list projection of the routine/todo hierarchy for drag-and-drop.
//!
//! # Responsibility
//! - Flatten routines and their nested todos into one ordered list, grouped
//!   by routine headers and annotated with nesting level.
//! - Rebuild routine membership and parent links from a reordered list.
//!
//! # Invariants
//! - Parents are only taken from entries under the same header, so a rebuilt
//!   `parent_id` always points into the same routine.
//! - Levels are taken as given. Reconstruction does not re-derive them from
//!   the drop position.

use crate::model::routine::{Routine, RoutineId};
use crate::model::todo::{Todo, TodoId};
use crate::tree::routine_options;
use std::collections::{HashMap, HashSet};

/// Display name of the group holding todos without a known routine.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Header grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutineGroup {
    Routine(RoutineId),
    Uncategorized,
}

impl RoutineGroup {
    pub fn routine_id(self) -> Option<RoutineId> {
        match self {
            Self::Routine(id) => Some(id),
            Self::Uncategorized => None,
        }
    }
}

/// One row of the flattened list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    Header {
        group: RoutineGroup,
        name: String,
        /// Nesting depth of the routine in the routine tree.
        depth: usize,
    },
    Todo {
        todo_id: TodoId,
        /// 0 for root todos, +1 per sub-todo level.
        level: usize,
    },
}

/// Todo with its sub-todos, in stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoNode {
    pub todo: Todo,
    pub sub_todos: Vec<TodoNode>,
}

/// Where one todo lands after reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoPlacement {
    pub todo_id: TodoId,
    pub routine_id: Option<RoutineId>,
    pub parent_id: Option<TodoId>,
    pub level: usize,
}

/// Builds the sub-todo forest of one routine group.
///
/// Todos whose parent is missing from `todos` become roots. Todos caught in a
/// parent cycle are emitted as roots after the regular forest.
pub fn build_todo_forest(todos: &[&Todo]) -> Vec<TodoNode> {
    let ids: HashSet<TodoId> = todos.iter().map(|todo| todo.id).collect();
    let mut children: HashMap<TodoId, Vec<&Todo>> = HashMap::new();
    let mut roots = Vec::new();
    for todo in todos {
        match todo.parent_id.filter(|parent| ids.contains(parent)) {
            Some(parent) => children.entry(parent).or_default().push(todo),
            None => roots.push(*todo),
        }
    }

    let mut visited = HashSet::new();
    let mut forest: Vec<TodoNode> = roots
        .into_iter()
        .filter_map(|todo| build_node(todo, &children, &mut visited))
        .collect();

    for todo in todos {
        if !visited.contains(&todo.id) {
            if let Some(node) = build_node(todo, &children, &mut visited) {
                forest.push(node);
            }
        }
    }
    forest
}

fn build_node(
    todo: &Todo,
    children: &HashMap<TodoId, Vec<&Todo>>,
    visited: &mut HashSet<TodoId>,
) -> Option<TodoNode> {
    if !visited.insert(todo.id) {
        return None;
    }
    let sub_todos = children
        .get(&todo.id)
        .map(|kids| {
            kids.iter()
                .filter_map(|kid| build_node(kid, children, visited))
                .collect()
        })
        .unwrap_or_default();
    Some(TodoNode {
        todo: todo.clone(),
        sub_todos,
    })
}

/// Flattens routines and todos into the draggable list.
///
/// Routines without todos get no header. Groups listed in `collapsed` keep
/// their header but hide their todos.
pub fn flatten_for_display(
    routines: &[Routine],
    todos: &[Todo],
    collapsed: &HashSet<RoutineGroup>,
) -> Vec<ListEntry> {
    let mut entries = Vec::new();
    let mut known = HashSet::new();

    for option in routine_options(routines) {
        known.insert(option.id);
        let group_todos: Vec<&Todo> = todos
            .iter()
            .filter(|todo| todo.routine_id == Some(option.id))
            .collect();
        let group = RoutineGroup::Routine(option.id);
        push_group(
            &mut entries,
            group,
            option.name,
            option.level,
            &group_todos,
            collapsed.contains(&group),
        );
    }

    let uncategorized: Vec<&Todo> = todos
        .iter()
        .filter(|todo| todo.routine_id.map_or(true, |id| !known.contains(&id)))
        .collect();
    push_group(
        &mut entries,
        RoutineGroup::Uncategorized,
        UNCATEGORIZED_LABEL.to_string(),
        0,
        &uncategorized,
        collapsed.contains(&RoutineGroup::Uncategorized),
    );

    entries
}

fn push_group(
    entries: &mut Vec<ListEntry>,
    group: RoutineGroup,
    name: String,
    depth: usize,
    todos: &[&Todo],
    collapsed: bool,
) {
    if todos.is_empty() {
        return;
    }
    entries.push(ListEntry::Header { group, name, depth });
    if !collapsed {
        flatten_forest(&build_todo_forest(todos), 0, entries);
    }
}

fn flatten_forest(nodes: &[TodoNode], level: usize, entries: &mut Vec<ListEntry>) {
    for node in nodes {
        entries.push(ListEntry::Todo {
            todo_id: node.todo.id,
            level,
        });
        flatten_forest(&node.sub_todos, level + 1, entries);
    }
}

/// Rebuilds routine membership and parent links from a flat list.
///
/// A header resets the level stack. For each todo, stack entries with a level
/// greater than or equal to the todo's level are popped; the remaining top is
/// the parent. Entries before the first header are uncategorized.
pub fn reconstruct(entries: &[ListEntry]) -> Vec<TodoPlacement> {
    let mut placements = Vec::new();
    let mut stack: Vec<(usize, TodoId)> = Vec::new();
    let mut routine_id = None;

    for entry in entries {
        match entry {
            ListEntry::Header { group, .. } => {
                stack.clear();
                routine_id = group.routine_id();
            }
            ListEntry::Todo { todo_id, level } => {
                while stack.last().map_or(false, |(top, _)| *top >= *level) {
                    stack.pop();
                }
                placements.push(TodoPlacement {
                    todo_id: *todo_id,
                    routine_id,
                    parent_id: stack.last().map(|(_, id)| *id),
                    level: *level,
                });
                stack.push((*level, *todo_id));
            }
        }
    }
    placements
}

/// Applies a reordered list to the persisted todo collection.
///
/// Listed todos come first in list order with rewritten `routine_id` and
/// `parent_id`. Todos absent from the list (collapsed groups) follow in their
/// previous relative order, unchanged. Unknown ids and repeats of an id are
/// dropped before reconstruction, so they never become parents.
pub fn apply_reorder(todos: Vec<Todo>, entries: &[ListEntry]) -> Vec<Todo> {
    let order: Vec<TodoId> = todos.iter().map(|todo| todo.id).collect();
    let mut by_id: HashMap<TodoId, Todo> = todos.into_iter().map(|todo| (todo.id, todo)).collect();
    let mut result = Vec::with_capacity(order.len());

    let mut seen = HashSet::new();
    let usable: Vec<ListEntry> = entries
        .iter()
        .filter(|entry| match entry {
            ListEntry::Header { .. } => true,
            ListEntry::Todo { todo_id, .. } => by_id.contains_key(todo_id) && seen.insert(*todo_id),
        })
        .cloned()
        .collect();

    for placement in reconstruct(&usable) {
        if let Some(mut todo) = by_id.remove(&placement.todo_id) {
            todo.routine_id = placement.routine_id;
            todo.parent_id = placement.parent_id;
            result.push(todo);
        }
    }
    for id in order {
        if let Some(todo) = by_id.remove(&id) {
            result.push(todo);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{
        apply_reorder, build_todo_forest, flatten_for_display, reconstruct, ListEntry,
        RoutineGroup,
    };
    use crate::model::routine::Routine;
    use crate::model::todo::Todo;
    use std::collections::HashSet;

    fn todo_in(routine: &Routine, text: &str) -> Todo {
        let mut todo = Todo::new(text);
        todo.routine_id = Some(routine.id);
        todo
    }

    fn child_of(parent: &Todo, text: &str) -> Todo {
        let mut todo = Todo::new(text);
        todo.routine_id = parent.routine_id;
        todo.parent_id = Some(parent.id);
        todo
    }

    #[test]
    fn flatten_annotates_levels_under_headers() {
        let home = Routine::new("Home");
        let root = todo_in(&home, "clean");
        let child = child_of(&root, "kitchen");
        let grandchild = child_of(&child, "oven");
        let loose = Todo::new("call bank");

        let entries = flatten_for_display(
            &[home.clone()],
            &[root.clone(), child.clone(), grandchild.clone(), loose.clone()],
            &HashSet::new(),
        );

        assert_eq!(entries.len(), 6);
        assert!(matches!(
            &entries[0],
            ListEntry::Header { group: RoutineGroup::Routine(id), .. } if *id == home.id
        ));
        assert_eq!(entries[1], ListEntry::Todo { todo_id: root.id, level: 0 });
        assert_eq!(entries[2], ListEntry::Todo { todo_id: child.id, level: 1 });
        assert_eq!(entries[3], ListEntry::Todo { todo_id: grandchild.id, level: 2 });
        assert!(matches!(
            &entries[4],
            ListEntry::Header { group: RoutineGroup::Uncategorized, .. }
        ));
        assert_eq!(entries[5], ListEntry::Todo { todo_id: loose.id, level: 0 });
    }

    #[test]
    fn collapsed_group_keeps_header_only() {
        let home = Routine::new("Home");
        let todo = todo_in(&home, "laundry");
        let collapsed = HashSet::from([RoutineGroup::Routine(home.id)]);

        let entries = flatten_for_display(&[home], &[todo], &collapsed);
        assert_eq!(entries.len(), 1);
        assert!(matches!(entries[0], ListEntry::Header { .. }));
    }

    #[test]
    fn reconstruct_pops_to_shallower_level() {
        let home = Routine::new("Home");
        let a = todo_in(&home, "a");
        let b = child_of(&a, "b");
        let c = child_of(&b, "c");
        let d = todo_in(&home, "d");
        let e = child_of(&d, "e");

        let entries = flatten_for_display(
            &[home.clone()],
            &[a.clone(), b.clone(), c.clone(), d.clone(), e.clone()],
            &HashSet::new(),
        );
        let placements = reconstruct(&entries);
        let parents: Vec<_> = placements.iter().map(|p| p.parent_id).collect();
        assert_eq!(parents, vec![None, Some(a.id), Some(b.id), None, Some(d.id)]);
        assert!(placements.iter().all(|p| p.routine_id == Some(home.id)));
    }

    #[test]
    fn flatten_then_reconstruct_preserves_tree() {
        let home = Routine::new("Home");
        let work = Routine::new("Work").with_children(vec![Routine::new("Meetings")]);
        let meetings = work.children[0].clone();
        let a = todo_in(&home, "a");
        let a1 = child_of(&a, "a1");
        let a2 = child_of(&a, "a2");
        let a21 = child_of(&a2, "a21");
        let w = todo_in(&work, "w");
        let m = todo_in(&meetings, "m");
        let m1 = child_of(&m, "m1");
        let routines = vec![home, work];
        let todos = vec![a, a1, a2, a21, w, m, m1];

        let entries = flatten_for_display(&routines, &todos, &HashSet::new());
        let rebuilt = apply_reorder(todos.clone(), &entries);

        assert_eq!(rebuilt.len(), todos.len());
        for original in &todos {
            let after = rebuilt
                .iter()
                .find(|todo| todo.id == original.id)
                .expect("todo kept");
            assert_eq!(after.parent_id, original.parent_id, "{}", original.text);
            assert_eq!(after.routine_id, original.routine_id, "{}", original.text);
        }
        let before: Vec<&Todo> = todos.iter().collect();
        let after: Vec<&Todo> = rebuilt.iter().collect();
        assert_eq!(build_todo_forest(&before), build_todo_forest(&after));
    }

    #[test]
    fn dragging_todo_under_other_header_moves_it_to_that_routine() {
        let home = Routine::new("Home");
        let work = Routine::new("Work");
        let h = todo_in(&home, "h");
        let w = todo_in(&work, "w");
        let mut entries = flatten_for_display(
            &[home.clone(), work.clone()],
            &[h.clone(), w.clone()],
            &HashSet::new(),
        );
        // [Home, h, Work, w] -> [Home, Work, w, h(level 1)]
        let moved = entries.remove(1);
        assert_eq!(moved, ListEntry::Todo { todo_id: h.id, level: 0 });
        entries.push(ListEntry::Todo { todo_id: h.id, level: 1 });

        let rebuilt = apply_reorder(vec![h.clone(), w.clone()], &entries);
        assert_eq!(rebuilt[0].id, w.id);
        assert_eq!(rebuilt[1].id, h.id);
        assert_eq!(rebuilt[1].routine_id, Some(work.id));
        assert_eq!(rebuilt[1].parent_id, Some(w.id));
    }

    #[test]
    fn todos_missing_from_list_keep_their_fields() {
        let home = Routine::new("Home");
        let hidden = todo_in(&home, "hidden");
        let loose = Todo::new("loose");
        let entries = vec![
            ListEntry::Header {
                group: RoutineGroup::Uncategorized,
                name: "Uncategorized".to_string(),
                depth: 0,
            },
            ListEntry::Todo { todo_id: loose.id, level: 0 },
        ];

        let rebuilt = apply_reorder(vec![hidden.clone(), loose.clone()], &entries);
        assert_eq!(rebuilt, vec![loose, hidden]);
    }

    #[test]
    fn unknown_ids_never_become_parents() {
        let home = Routine::new("Home");
        let a = todo_in(&home, "a");
        let ghost = Todo::new("ghost");
        let entries = vec![
            ListEntry::Header {
                group: RoutineGroup::Routine(home.id),
                name: "Home".to_string(),
                depth: 0,
            },
            ListEntry::Todo { todo_id: ghost.id, level: 0 },
            ListEntry::Todo { todo_id: a.id, level: 1 },
        ];

        let rebuilt = apply_reorder(vec![a.clone()], &entries);
        assert_eq!(rebuilt.len(), 1);
        assert_eq!(rebuilt[0].id, a.id);
        assert_eq!(rebuilt[0].parent_id, None);
        assert_eq!(rebuilt[0].routine_id, Some(home.id));
    }

    #[test]
    fn repeated_id_keeps_first_position_and_is_not_a_parent_twice() {
        let home = Routine::new("Home");
        let work = Routine::new("Work");
        let h = todo_in(&home, "h");
        let w = todo_in(&work, "w");
        let entries = vec![
            ListEntry::Header {
                group: RoutineGroup::Routine(home.id),
                name: "Home".to_string(),
                depth: 0,
            },
            ListEntry::Todo { todo_id: h.id, level: 0 },
            ListEntry::Header {
                group: RoutineGroup::Routine(work.id),
                name: "Work".to_string(),
                depth: 0,
            },
            ListEntry::Todo { todo_id: h.id, level: 0 },
            ListEntry::Todo { todo_id: w.id, level: 1 },
        ];

        let rebuilt = apply_reorder(vec![h.clone(), w.clone()], &entries);
        assert_eq!(rebuilt[0].id, h.id);
        assert_eq!(rebuilt[0].routine_id, Some(home.id));
        assert_eq!(rebuilt[1].id, w.id);
        assert_eq!(rebuilt[1].routine_id, Some(work.id));
        assert_eq!(rebuilt[1].parent_id, None);
    }

    #[test]
    fn parent_cycle_does_not_drop_todos() {
        let home = Routine::new("Home");
        let mut a = todo_in(&home, "a");
        let mut b = todo_in(&home, "b");
        a.parent_id = Some(b.id);
        b.parent_id = Some(a.id);

        let entries = flatten_for_display(&[home], &[a.clone(), b.clone()], &HashSet::new());
        let todo_rows = entries
            .iter()
            .filter(|entry| matches!(entry, ListEntry::Todo { .. }))
            .count();
        assert_eq!(todo_rows, 2);
    }
}
