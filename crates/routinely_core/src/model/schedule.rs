//! Scheduling metadata attached to todos.
//!
//! # Responsibility
//! - Define date range and repeat rule shapes persisted with each todo.
//! - Resolve the single effective schedule shown next to a todo.
//!
//! # Invariants
//! - `DateRange` bounds are inclusive and `end_date >= start_date`.
//! - `RepeatSettings::end_date`, when set, is not earlier than `start_date`.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Inclusive calendar-day interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(alias = "start")]
    pub start_date: NaiveDate,
    #[serde(alias = "end")]
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Returns whether `day` lies inside the inclusive interval.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    pub fn is_ordered(&self) -> bool {
        self.start_date <= self.end_date
    }
}

/// Repeat cadence for recurring todos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Selected weekdays of every week.
    Weekly,
    /// Same day of month as the start date.
    Monthly,
    /// Same month and day as the start date.
    Yearly,
}

/// Weekday selection for weekly repeat rules.
///
/// Serialized as seven named booleans; missing names read as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weekdays {
    pub sunday: bool,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
}

impl Weekdays {
    /// Builds a selection from a list of chrono weekdays.
    pub fn from_days(days: &[Weekday]) -> Self {
        let mut selection = Self::default();
        for day in days {
            selection.set(*day, true);
        }
        selection
    }

    pub fn contains(&self, day: Weekday) -> bool {
        match day {
            Weekday::Sun => self.sunday,
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
        }
    }

    pub fn set(&mut self, day: Weekday, selected: bool) {
        let slot = match day {
            Weekday::Sun => &mut self.sunday,
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
        };
        *slot = selected;
    }

    /// Returns `true` when no weekday is selected.
    pub fn is_empty(&self) -> bool {
        !(self.sunday
            || self.monday
            || self.tuesday
            || self.wednesday
            || self.thursday
            || self.friday
            || self.saturday)
    }

    /// Selected days in Sunday-first order.
    pub fn selected(&self) -> Vec<Weekday> {
        [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ]
        .into_iter()
        .filter(|day| self.contains(*day))
        .collect()
    }
}

/// Repeat rule for a recurring todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatSettings {
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Only meaningful for `Frequency::Weekly`.
    #[serde(default)]
    pub weekdays: Weekdays,
}

impl RepeatSettings {
    pub fn weekly(start_date: NaiveDate, weekdays: Weekdays) -> Self {
        Self {
            frequency: Frequency::Weekly,
            start_date,
            end_date: None,
            weekdays,
        }
    }

    pub fn monthly(start_date: NaiveDate) -> Self {
        Self {
            frequency: Frequency::Monthly,
            start_date,
            end_date: None,
            weekdays: Weekdays::default(),
        }
    }

    pub fn yearly(start_date: NaiveDate) -> Self {
        Self {
            frequency: Frequency::Yearly,
            start_date,
            end_date: None,
            weekdays: Weekdays::default(),
        }
    }

    /// Returns a copy bounded by `end_date`.
    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn is_ordered(&self) -> bool {
        self.end_date.map_or(true, |end| self.start_date <= end)
    }
}

/// Effective schedule of one todo.
///
/// A todo may carry several scheduling fields at once; the displayed one
/// follows the precedence due date, then date range, then repeat rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule<'a> {
    Due(NaiveDateTime),
    Range(&'a DateRange),
    Repeat(&'a RepeatSettings),
}

impl Schedule<'_> {
    /// Short machine-friendly label for the schedule kind.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Due(_) => "due",
            Self::Range(_) => "range",
            Self::Repeat(settings) => match settings.frequency {
                Frequency::Weekly => "weekly",
                Frequency::Monthly => "monthly",
                Frequency::Yearly => "yearly",
            },
        }
    }

    /// Human-readable summary relative to `today`.
    ///
    /// Due dates read as `today 09:30`, `tomorrow 09:30` or
    /// `Apr 9 (Tue) 09:30`. Ranges read as `Apr 1 - Apr 5`. Weekly rules list
    /// their days Sunday first.
    pub fn describe(&self, today: NaiveDate) -> String {
        match self {
            Self::Due(due) => {
                let day = due.date();
                let relative = if day == today {
                    "today".to_string()
                } else if today.succ_opt() == Some(day) {
                    "tomorrow".to_string()
                } else {
                    day.format("%b %-d (%a)").to_string()
                };
                format!("{relative} {}", due.format("%H:%M"))
            }
            Self::Range(range) => format!(
                "{} - {}",
                range.start_date.format("%b %-d"),
                range.end_date.format("%b %-d")
            ),
            Self::Repeat(settings) => match settings.frequency {
                Frequency::Weekly if settings.weekdays.is_empty() => {
                    "every week (no days)".to_string()
                }
                Frequency::Weekly => {
                    let days: Vec<String> = settings
                        .weekdays
                        .selected()
                        .into_iter()
                        .map(|day| day.to_string())
                        .collect();
                    format!("every {}", days.join(", "))
                }
                Frequency::Monthly => "every month".to_string(),
                Frequency::Yearly => "every year".to_string(),
            },
        }
    }
}
