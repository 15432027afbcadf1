//! Core domain logic for Routinely.
//! This crate owns the routine tree, todo scheduling and local persistence.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod reorder;
pub mod repo;
pub mod service;
pub mod tree;

pub use calendar::{mark_calendar, todos_due_on, CalendarMarks, DayMarks, Dot, MarkKind, PeriodMark};
pub use config::{CalendarHorizon, CoreConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::routine::{Routine, RoutineId};
pub use model::schedule::{DateRange, Frequency, RepeatSettings, Schedule, Weekdays};
pub use model::todo::{Priority, Todo, TodoId, TodoValidationError};
pub use reorder::{ListEntry, RoutineGroup};
pub use repo::kv_repo::{KvRepoError, KvRepository, SqliteKvRepository};
pub use repo::planner_repo::{KvPlannerRepository, PlannerRepository, RepoError, RepoResult};
pub use service::routine_service::{RoutineDeletion, RoutineService, RoutineServiceError};
pub use service::todo_service::{NewTodo, ScheduleInput, TodoService, TodoServiceError, TodoStats};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
