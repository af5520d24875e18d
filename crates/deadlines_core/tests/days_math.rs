use chrono::{Duration, FixedOffset, NaiveDate, TimeZone};
use deadlines_core::{days_until, days_until_at, days_until_text, Clock, ManualClock};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn same_day_is_zero() {
    for day in [date(2024, 2, 29), date(2025, 1, 1), date(2025, 12, 31)] {
        assert_eq!(days_until(day, day), 0);
    }
}

#[test]
fn offsets_are_symmetric_and_never_roll_over() {
    let today = date(2025, 4, 1);
    for n in [1_i64, 7, 30, 365, 400] {
        assert_eq!(days_until(today, today + Duration::days(n)), n);
        assert_eq!(days_until(today, today - Duration::days(n)), -n);
    }
    // March 1 seen from April 1 is overdue, not next year's March 1.
    assert_eq!(days_until(today, date(2025, 3, 1)), -31);
}

#[test]
fn timezone_offset_within_a_day_does_not_matter() {
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let la = FixedOffset::west_opt(8 * 3600).unwrap();
    let target = date(2025, 9, 10);

    let tokyo_morning = tokyo.with_ymd_and_hms(2025, 9, 5, 0, 30, 0).unwrap();
    let la_night = la.with_ymd_and_hms(2025, 9, 5, 23, 30, 0).unwrap();
    assert_eq!(days_until_at(&tokyo_morning, target), 5);
    assert_eq!(days_until_at(&la_night, target), 5);
}

#[test]
fn labels_match_display_mapping() {
    assert_eq!(days_until_text(-5), "Overdue!");
    assert_eq!(days_until_text(0), "Today!");
    assert_eq!(days_until_text(1), "1 day");
    assert_eq!(days_until_text(2), "2 days");
}

#[test]
fn manual_clock_is_shared_between_clones() {
    let clock = ManualClock::at_date(date(2025, 5, 31));
    let observer = clock.clone();

    clock.advance_days(1);
    assert_eq!(observer.today(), date(2025, 6, 1));

    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    clock.set(offset.with_ymd_and_hms(2026, 1, 1, 0, 15, 0).unwrap());
    assert_eq!(observer.today(), date(2026, 1, 1));
}
