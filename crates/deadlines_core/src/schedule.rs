//! Midnight timer driving the once-per-day store refresh.
//!
//! # Responsibility
//! - Keep exactly one pending alarm for the next local midnight.
//! - Invoke the host callback once per observed calendar-day change.
//!
//! # Invariants
//! - The wait target is recomputed from the clock on every iteration.
//! - A wake-up that lands on the same calendar day re-arms without firing.
//! - After `cancel()` returns, the callback never runs again.

use crate::days::{duration_until_next_midnight, Clock};
use chrono::NaiveDate;
use log::{debug, error, info};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

const TIMER_THREAD_NAME: &str = "deadlines-midnight";
/// Upper bound on a single wait so wall-clock jumps are noticed.
const MAX_WAIT: Duration = Duration::from_secs(15 * 60);
const MIN_WAIT: Duration = Duration::from_millis(10);

/// Handle to the background midnight timer.
pub struct MidnightTimer {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MidnightTimer {
    /// Spawns the timer thread.
    ///
    /// `on_tick` receives the new local calendar day each time the day
    /// changes.
    ///
    /// # Errors
    /// Returns the OS error when the worker thread cannot be spawned.
    pub fn start<C, F>(clock: C, on_tick: F) -> std::io::Result<Self>
    where
        C: Clock + Send + 'static,
        F: FnMut(NaiveDate) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let last_day = clock.today();

        let handle = std::thread::Builder::new()
            .name(TIMER_THREAD_NAME.to_owned())
            .spawn(move || run_timer(clock, last_day, stop_rx, on_tick))
            .map_err(|err| {
                error!(
                    "event=timer_start module=schedule status=error error_code=spawn_failed error={}",
                    err
                );
                err
            })?;

        info!("event=timer_start module=schedule status=ok armed_for={last_day}");
        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Whether the timer has not been cancelled yet.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stops the timer and waits for the worker thread to exit.
    ///
    /// Idempotent.
    pub fn cancel(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if handle.join().is_err() {
            error!("event=timer_cancel module=schedule status=error error_code=worker_panicked");
            return;
        }
        info!("event=timer_cancel module=schedule status=ok");
    }
}

impl Drop for MidnightTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run_timer<C, F>(
    clock: C,
    mut last_day: NaiveDate,
    stop_rx: mpsc::Receiver<()>,
    mut on_tick: F,
) where
    C: Clock,
    F: FnMut(NaiveDate),
{
    loop {
        let today = clock.today();
        if today != last_day {
            debug!("event=timer_tick module=schedule status=ok from={last_day} to={today}");
            last_day = today;
            on_tick(today);
        }

        let wait = next_wait(&clock);
        match stop_rx.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn next_wait(clock: &impl Clock) -> Duration {
    let remaining = duration_until_next_midnight(&clock.now())
        .to_std()
        .unwrap_or(MIN_WAIT);
    remaining.clamp(MIN_WAIT, MAX_WAIT)
}
