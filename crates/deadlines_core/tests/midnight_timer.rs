use chrono::{Duration, FixedOffset, NaiveDate, TimeZone};
use deadlines_core::{ManualClock, MidnightTimer};
use std::sync::mpsc;

fn just_before_midnight() -> ManualClock {
    let offset = FixedOffset::east_opt(0).unwrap();
    ManualClock::new(
        offset
            .with_ymd_and_hms(2025, 3, 29, 23, 59, 59)
            .unwrap(),
    )
}

#[test]
fn fires_once_when_the_calendar_day_changes() {
    let clock = just_before_midnight();
    let (tx, rx) = mpsc::channel();
    let mut timer = MidnightTimer::start(clock.clone(), move |day| {
        let _ = tx.send(day);
    })
    .unwrap();

    clock.advance(Duration::seconds(2));
    let fired = rx
        .recv_timeout(std::time::Duration::from_secs(5))
        .unwrap();
    assert_eq!(fired, NaiveDate::from_ymd_opt(2025, 3, 30).unwrap());

    timer.cancel();
    assert!(!timer.is_running());
    assert!(rx.try_recv().is_err());
}

#[test]
fn does_not_fire_while_the_day_is_unchanged() {
    let clock = just_before_midnight();
    let (tx, rx) = mpsc::channel::<NaiveDate>();
    let mut timer = MidnightTimer::start(clock, move |day| {
        let _ = tx.send(day);
    })
    .unwrap();

    assert!(rx
        .recv_timeout(std::time::Duration::from_millis(200))
        .is_err());
    timer.cancel();
}

#[test]
fn cancel_is_idempotent_and_drop_releases_the_thread() {
    let clock = just_before_midnight();
    let mut timer = MidnightTimer::start(clock.clone(), |_| {}).unwrap();
    assert!(timer.is_running());
    timer.cancel();
    timer.cancel();
    assert!(!timer.is_running());

    let dropped = MidnightTimer::start(clock, |_| {}).unwrap();
    drop(dropped);
}
