//! Calendar marking and recurrence expansion.
//!
//! # Responsibility
//! - Expand due dates, date ranges and repeat rules into concrete days.
//! - Collect per-day marks for a month/agenda view.
//!
//! # Invariants
//! - Expansion is recomputed from scratch on every call; nothing is cached.
//! - Open-ended repeat rules stop at the configured horizon past `today`.
//! - Monthly and yearly steps are computed from the start date, so a
//!   month-end start clamps per month without drifting.

use crate::config::CalendarHorizon;
use crate::model::schedule::{Frequency, RepeatSettings};
use crate::model::todo::{Todo, TodoId};
use chrono::{Datelike, Duration, Months, NaiveDate};
use std::collections::BTreeMap;

/// Source of one dot on a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Due,
    Weekly,
    Monthly,
    Yearly,
}

/// Single-day marker for one todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dot {
    pub todo_id: TodoId,
    pub kind: MarkKind,
    pub label: String,
}

/// Membership of one day in a todo's date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodMark {
    pub todo_id: TodoId,
    pub starting_day: bool,
    pub ending_day: bool,
}

/// Everything marked on one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayMarks {
    pub dots: Vec<Dot>,
    pub periods: Vec<PeriodMark>,
}

impl DayMarks {
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty() && self.periods.is_empty()
    }

    /// Returns whether `todo_id` contributed any mark to this day.
    pub fn mentions(&self, todo_id: TodoId) -> bool {
        self.dots.iter().any(|dot| dot.todo_id == todo_id)
            || self.periods.iter().any(|period| period.todo_id == todo_id)
    }
}

/// Day-keyed marks in ascending date order.
pub type CalendarMarks = BTreeMap<NaiveDate, DayMarks>;

/// Computes the last day expanded for `settings`.
///
/// Uses `end_date` when present, otherwise `today` plus the horizon for the
/// rule's frequency.
pub fn expansion_end(
    settings: &RepeatSettings,
    today: NaiveDate,
    horizon: &CalendarHorizon,
) -> Option<NaiveDate> {
    if let Some(end) = settings.end_date {
        return Some(end);
    }
    match settings.frequency {
        Frequency::Weekly => today.checked_add_signed(Duration::days(i64::from(horizon.weekly_days))),
        Frequency::Monthly => today.checked_add_months(Months::new(horizon.monthly_years * 12)),
        Frequency::Yearly => today.checked_add_months(Months::new(horizon.yearly_years * 12)),
    }
}

/// Expands a repeat rule into concrete occurrence days.
///
/// Weekly rules walk day by day and keep selected weekdays. Monthly and
/// yearly rules step from the start date. The result is empty when the end
/// precedes the start.
pub fn occurrences(
    settings: &RepeatSettings,
    today: NaiveDate,
    horizon: &CalendarHorizon,
) -> Vec<NaiveDate> {
    let Some(end) = expansion_end(settings, today, horizon) else {
        return Vec::new();
    };
    let start = settings.start_date;
    if end < start {
        return Vec::new();
    }

    match settings.frequency {
        Frequency::Weekly => {
            if settings.weekdays.is_empty() {
                return Vec::new();
            }
            start
                .iter_days()
                .take_while(|day| *day <= end)
                .filter(|day| settings.weekdays.contains(day.weekday()))
                .collect()
        }
        Frequency::Monthly => stepped(start, end, 1),
        Frequency::Yearly => stepped(start, end, 12),
    }
}

fn stepped(start: NaiveDate, end: NaiveDate, months_per_step: u32) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut step = 0u32;
    while let Some(day) = start.checked_add_months(Months::new(step * months_per_step)) {
        if day > end {
            break;
        }
        days.push(day);
        step += 1;
    }
    days
}

/// Builds calendar marks for every todo.
pub fn mark_calendar(todos: &[Todo], today: NaiveDate, horizon: &CalendarHorizon) -> CalendarMarks {
    let mut marks = CalendarMarks::new();
    for todo in todos {
        mark_todo(&mut marks, todo, today, horizon);
    }
    marks
}

fn mark_todo(marks: &mut CalendarMarks, todo: &Todo, today: NaiveDate, horizon: &CalendarHorizon) {
    if let Some(due) = todo.due_date {
        push_dot(marks, due.date(), todo, MarkKind::Due);
    }

    if let Some(range) = todo.date_range.filter(|range| range.is_ordered()) {
        for day in range
            .start_date
            .iter_days()
            .take_while(|day| *day <= range.end_date)
        {
            marks.entry(day).or_default().periods.push(PeriodMark {
                todo_id: todo.id,
                starting_day: day == range.start_date,
                ending_day: day == range.end_date,
            });
        }
    }

    if let Some(settings) = todo.repeat_settings.as_ref() {
        let kind = match settings.frequency {
            Frequency::Weekly => MarkKind::Weekly,
            Frequency::Monthly => MarkKind::Monthly,
            Frequency::Yearly => MarkKind::Yearly,
        };
        for day in occurrences(settings, today, horizon) {
            push_dot(marks, day, todo, kind);
        }
    }
}

fn push_dot(marks: &mut CalendarMarks, day: NaiveDate, todo: &Todo, kind: MarkKind) {
    marks.entry(day).or_default().dots.push(Dot {
        todo_id: todo.id,
        kind,
        label: todo.text.clone(),
    });
}

/// Todos whose due date falls on `day`, in stored order.
pub fn todos_due_on(todos: &[Todo], day: NaiveDate) -> Vec<&Todo> {
    todos.iter().filter(|todo| todo.is_due_on(day)).collect()
}
