//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `routinely_core` linkage and storage bootstrap from a terminal.
//! - Print a short, metadata-only summary of the configured store.

use chrono::{Datelike, Local};
use log::warn;
use routinely_core::db::open_db;
use routinely_core::{
    init_from_config, CoreConfig, KvPlannerRepository, RoutineService, SqliteKvRepository,
    TodoService,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("routinely_core ping={}", routinely_core::ping());
    println!("routinely_core version={}", routinely_core::core_version());

    let config = CoreConfig::from_env();
    if let Err(err) = init_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    let conn = open_db(&config.db_path)?;
    let routines = RoutineService::new(KvPlannerRepository::new(SqliteKvRepository::try_new(
        &conn,
    )?));
    let todos = TodoService::new(KvPlannerRepository::new(SqliteKvRepository::try_new(&conn)?));

    let today = Local::now().date_naive();
    let stats = todos.stats(None);
    let marked_this_month = todos
        .calendar_marks(today, &config.horizon)
        .range(today.with_day(1).unwrap_or(today)..)
        .take_while(|(day, _)| day.month() == today.month() && day.year() == today.year())
        .filter(|(_, marks)| !marks.is_empty())
        .count();
    if stats.total == 0 {
        warn!("event=cli_summary module=cli status=empty");
    }

    println!("db_path={}", config.db_path.display());
    println!("routines={}", routines.routine_options().len());
    println!(
        "todos={} completed={} remaining={}",
        stats.total, stats.completed, stats.remaining
    );
    println!("due_today={}", todos.todos_due_on(today).len());
    println!("days_marked_this_month={marked_this_month}");
    Ok(())
}
