use chrono::{Datelike, NaiveDate, Weekday};
use routinely_core::{
    mark_calendar, CalendarHorizon, DateRange, MarkKind, RepeatSettings, Todo, Weekdays,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn overlapping_ranges_keep_one_period_per_todo() {
    let mut trip = Todo::new("trip");
    trip.date_range = Some(DateRange::new(day(2024, 7, 1), day(2024, 7, 5)));
    let mut conference = Todo::new("conference");
    conference.date_range = Some(DateRange::new(day(2024, 7, 4), day(2024, 7, 6)));

    let marks = mark_calendar(
        &[trip.clone(), conference.clone()],
        day(2024, 7, 1),
        &CalendarHorizon::default(),
    );

    assert_eq!(marks.len(), 6);
    let overlap = &marks[&day(2024, 7, 4)];
    assert_eq!(overlap.periods.len(), 2);
    assert!(overlap.mentions(trip.id));
    assert!(overlap.mentions(conference.id));
    assert!(overlap
        .periods
        .iter()
        .any(|period| period.todo_id == conference.id && period.starting_day));
}

#[test]
fn weekly_rule_with_end_date_marks_selected_days_only() {
    let mut gym = Todo::new("gym");
    gym.repeat_settings = Some(
        RepeatSettings::weekly(
            day(2024, 3, 1),
            Weekdays::from_days(&[Weekday::Tue, Weekday::Thu]),
        )
        .until(day(2024, 3, 31)),
    );

    let marks = mark_calendar(&[gym], day(2030, 1, 1), &CalendarHorizon::default());

    assert_eq!(marks.len(), 8);
    for (date, day_marks) in &marks {
        assert!(matches!(date.weekday(), Weekday::Tue | Weekday::Thu));
        assert_eq!(day_marks.dots[0].kind, MarkKind::Weekly);
    }
}

#[test]
fn custom_horizon_limits_open_ended_rules() {
    let mut rent = Todo::new("rent");
    rent.repeat_settings = Some(RepeatSettings::monthly(day(2024, 1, 1)));
    let horizon = CalendarHorizon {
        monthly_years: 1,
        ..CalendarHorizon::default()
    };

    let marks = mark_calendar(&[rent], day(2024, 1, 1), &horizon);

    assert_eq!(marks.len(), 13);
    assert_eq!(marks.keys().last(), Some(&day(2025, 1, 1)));
}
