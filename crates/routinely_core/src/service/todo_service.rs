//! Todo use-case service.
//!
//! # Responsibility
//! - Validate new todos against the routine tree and parent todos.
//! - Provide toggle, delete, edit, priority, schedule and reorder mutations.
//! - Provide read views: per-routine lists, due-today, stats, the draggable
//!   list and calendar marks.
//!
//! # Invariants
//! - New todos belong to an existing routine.
//! - A parent todo must exist and share the child's routine.
//! - Deleting a todo also deletes its sub-todos.

use crate::calendar::{self, CalendarMarks};
use crate::config::CalendarHorizon;
use crate::model::routine::RoutineId;
use crate::model::schedule::{DateRange, RepeatSettings};
use crate::model::todo::{Priority, Todo, TodoId, TodoValidationError};
use crate::reorder::{self, ListEntry, RoutineGroup};
use crate::repo::planner_repo::{PlannerRepository, RepoError};
use crate::service::{load_routines_or_default, load_todos_or_default, save_todos_logged};
use crate::tree;
use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from todo service operations.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Record-level validation failed (blank text, reversed dates).
    Validation(TodoValidationError),
    /// Target routine does not exist.
    RoutineNotFound(RoutineId),
    /// Target todo does not exist.
    TodoNotFound(TodoId),
    /// Parent todo does not exist.
    ParentNotFound(TodoId),
    /// Parent todo belongs to a different routine.
    ParentInOtherRoutine { parent_id: TodoId },
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::RoutineNotFound(id) => write!(f, "routine not found: {id}"),
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent todo not found: {id}"),
            Self::ParentInOtherRoutine { parent_id } => {
                write!(f, "parent todo {parent_id} belongs to another routine")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Scheduling fields supplied when creating or rescheduling a todo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleInput {
    pub due_date: Option<NaiveDateTime>,
    pub date_range: Option<DateRange>,
    pub repeat_settings: Option<RepeatSettings>,
}

/// Request model for creating a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub text: String,
    pub routine_id: RoutineId,
    pub parent_id: Option<TodoId>,
    pub schedule: ScheduleInput,
    pub priority: Option<Priority>,
}

impl NewTodo {
    pub fn new(text: impl Into<String>, routine_id: RoutineId) -> Self {
        Self {
            text: text.into(),
            routine_id,
            parent_id: None,
            schedule: ScheduleInput::default(),
            priority: None,
        }
    }

    pub fn under(mut self, parent_id: TodoId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn due(mut self, due_date: NaiveDateTime) -> Self {
        self.schedule.due_date = Some(due_date);
        self
    }

    pub fn spanning(mut self, range: DateRange) -> Self {
        self.schedule.date_range = Some(range);
        self
    }

    pub fn repeating(mut self, settings: RepeatSettings) -> Self {
        self.schedule.repeat_settings = Some(settings);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Completion counters for one set of todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

impl TodoStats {
    pub fn from_todos<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Self {
        let mut stats = Self::default();
        for todo in todos {
            stats.total += 1;
            if todo.completed {
                stats.completed += 1;
            } else {
                stats.remaining += 1;
            }
        }
        stats
    }
}

/// Todo service facade.
pub struct TodoService<R: PlannerRepository> {
    repo: R,
}

impl<R: PlannerRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns every stored todo, or an empty list when unreadable.
    pub fn list_todos(&self) -> Vec<Todo> {
        load_todos_or_default(&self.repo)
    }

    pub fn get_todo(&self, id: TodoId) -> Option<Todo> {
        self.list_todos().into_iter().find(|todo| todo.id == id)
    }

    /// Todos of one routine in stored order, sub-todos included.
    pub fn list_routine_todos(&self, routine_id: RoutineId) -> Vec<Todo> {
        self.list_todos()
            .into_iter()
            .filter(|todo| todo.routine_id == Some(routine_id))
            .collect()
    }

    /// Todos due on `day`, in stored order.
    pub fn todos_due_on(&self, day: NaiveDate) -> Vec<Todo> {
        calendar::todos_due_on(&self.list_todos(), day)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Completion counters, optionally restricted to one routine.
    pub fn stats(&self, routine_id: Option<RoutineId>) -> TodoStats {
        let todos = self.list_todos();
        TodoStats::from_todos(
            todos
                .iter()
                .filter(|todo| routine_id.map_or(true, |id| todo.routine_id == Some(id))),
        )
    }

    /// Flattened, header-grouped list for drag-and-drop views.
    pub fn display_list(&self, collapsed: &HashSet<RoutineGroup>) -> Vec<ListEntry> {
        let routines = load_routines_or_default(&self.repo);
        reorder::flatten_for_display(&routines, &self.list_todos(), collapsed)
    }

    /// Calendar marks for every todo.
    pub fn calendar_marks(&self, today: NaiveDate, horizon: &CalendarHorizon) -> CalendarMarks {
        calendar::mark_calendar(&self.list_todos(), today, horizon)
    }

    /// Creates one todo.
    pub fn add_todo(&self, request: NewTodo) -> Result<Todo, TodoServiceError> {
        let routines = self.repo.load_routines()?;
        let mut todos = self.repo.load_todos()?;

        if !tree::contains_routine(&routines, request.routine_id) {
            return Err(TodoServiceError::RoutineNotFound(request.routine_id));
        }
        if let Some(parent_id) = request.parent_id {
            let parent = todos
                .iter()
                .find(|todo| todo.id == parent_id)
                .ok_or(TodoServiceError::ParentNotFound(parent_id))?;
            if parent.routine_id != Some(request.routine_id) {
                return Err(TodoServiceError::ParentInOtherRoutine { parent_id });
            }
        }

        let mut todo = Todo::new(request.text.trim());
        todo.routine_id = Some(request.routine_id);
        todo.parent_id = request.parent_id;
        todo.due_date = request.schedule.due_date;
        todo.date_range = request.schedule.date_range;
        todo.repeat_settings = request.schedule.repeat_settings;
        todo.priority = request.priority;
        todo.validate()?;

        todos.push(todo.clone());
        save_todos_logged(&self.repo, &todos)?;

        info!(
            "event=todo_create module=service status=ok todo_id={} routine_id={} schedule={}",
            todo.id,
            request.routine_id,
            todo.schedule().map_or("none", |schedule| schedule.label())
        );
        Ok(todo)
    }

    /// Flips completion of one todo. Returns the new state.
    pub fn toggle_todo(&self, id: TodoId) -> Result<bool, TodoServiceError> {
        self.update_todo(id, |todo| {
            todo.toggle();
            Ok(todo.completed)
        })
    }

    /// Replaces the text of one todo.
    pub fn edit_text(&self, id: TodoId, text: impl Into<String>) -> Result<(), TodoServiceError> {
        let text = text.into();
        self.update_todo(id, |todo| {
            todo.text = text.trim().to_string();
            todo.validate()?;
            Ok(())
        })
    }

    /// Sets or clears the Eisenhower priority of one todo.
    pub fn set_priority(
        &self,
        id: TodoId,
        priority: Option<Priority>,
    ) -> Result<(), TodoServiceError> {
        self.update_todo(id, |todo| {
            todo.priority = priority;
            Ok(())
        })
    }

    /// Replaces all scheduling fields of one todo.
    pub fn reschedule(&self, id: TodoId, schedule: ScheduleInput) -> Result<(), TodoServiceError> {
        self.update_todo(id, |todo| {
            todo.due_date = schedule.due_date;
            todo.date_range = schedule.date_range;
            todo.repeat_settings = schedule.repeat_settings;
            todo.validate()?;
            Ok(())
        })
    }

    /// Deletes one todo and all of its sub-todos. Returns removed ids.
    pub fn delete_todo(&self, id: TodoId) -> Result<Vec<TodoId>, TodoServiceError> {
        let todos = self.repo.load_todos()?;
        if !todos.iter().any(|todo| todo.id == id) {
            return Err(TodoServiceError::TodoNotFound(id));
        }

        let doomed = descendants_with_self(&todos, id);
        let (removed, kept): (Vec<_>, Vec<_>) =
            todos.into_iter().partition(|todo| doomed.contains(&todo.id));
        save_todos_logged(&self.repo, &kept)?;

        info!(
            "event=todo_delete module=service status=ok todo_id={} removed={}",
            id,
            removed.len()
        );
        Ok(removed.into_iter().map(|todo| todo.id).collect())
    }

    /// Persists a reordered display list.
    pub fn reorder(&self, entries: &[ListEntry]) -> Result<(), TodoServiceError> {
        let todos = self.repo.load_todos()?;
        let reordered = reorder::apply_reorder(todos, entries);
        save_todos_logged(&self.repo, &reordered)?;
        info!(
            "event=todo_reorder module=service status=ok entries={}",
            entries.len()
        );
        Ok(())
    }

    fn update_todo<T>(
        &self,
        id: TodoId,
        mutate: impl FnOnce(&mut Todo) -> Result<T, TodoServiceError>,
    ) -> Result<T, TodoServiceError> {
        let mut todos = self.repo.load_todos()?;
        let todo = todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or(TodoServiceError::TodoNotFound(id))?;
        let output = mutate(todo)?;
        save_todos_logged(&self.repo, &todos)?;
        Ok(output)
    }
}

fn descendants_with_self(todos: &[Todo], root: TodoId) -> HashSet<TodoId> {
    let mut children: HashMap<TodoId, Vec<TodoId>> = HashMap::new();
    for todo in todos {
        if let Some(parent_id) = todo.parent_id {
            children.entry(parent_id).or_default().push(todo.id);
        }
    }

    let mut found = HashSet::new();
    let mut pending = vec![root];
    while let Some(current) = pending.pop() {
        if !found.insert(current) {
            continue;
        }
        if let Some(kids) = children.get(&current) {
            pending.extend(kids.iter().copied());
        }
    }
    found
}
