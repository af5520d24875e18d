//! Deadline store: the authoritative in-memory collection.
//!
//! # Responsibility
//! - Load the persisted collection (or seed data) and keep it in memory.
//! - Apply add/rename/remove and the overdue-cleanup sweep.
//! - Persist the full collection after every effective mutation.
//! - Notify subscribers and own the single midnight timer.
//!
//! # Invariants
//! - Ids are unique across the live collection.
//! - Invalid input and unknown ids are no-ops, never errors.
//! - Persistence failures are logged and never roll back memory state.
//! - Day-counts in `sorted_view()` are computed at call time.

use crate::days::{days_until, days_until_text, Clock, SystemClock};
use crate::model::deadline::{
    normalize_name, resolve_month_day_in_year_of, Deadline, DeadlineId,
};
use crate::repo::deadline_repo::{load_deadlines, save_deadlines};
use crate::repo::kv_store::KeyValueStore;
use crate::schedule::MidnightTimer;
use chrono::{Duration, NaiveDate};
use log::{debug, info, warn};
use uuid::Uuid;

/// Records overdue by more than this many days are purged by the sweep.
pub const OVERDUE_GRACE_DAYS: i64 = 7;

/// Sample records used when nothing is persisted: `(name, days from load)`.
pub const SEED_DEADLINES: &[(&str, i64)] = &[
    ("Project Alpha", 3),
    ("Submit Report", 10),
    ("Conference", 24),
];

/// Source of fresh deadline ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> DeadlineId;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&mut self) -> DeadlineId {
        Uuid::new_v4()
    }
}

/// Deterministic ids `…0001`, `…0002`, … for tests and fixtures.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    next: u128,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Starts at `first`; zero is bumped to one because nil ids are invalid.
    pub fn starting_at(first: u128) -> Self {
        Self { next: first.max(1) }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> DeadlineId {
        let id = Uuid::from_u128(self.next);
        self.next = self.next.wrapping_add(1).max(1);
        id
    }
}

/// Read-only row for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineView {
    pub id: DeadlineId,
    pub name: String,
    pub date: NaiveDate,
    pub days_until: i64,
    /// Output of `days_until_text(days_until)`.
    pub label: String,
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// The collection changed; re-read `sorted_view()`.
    Changed,
    /// The local calendar day rolled over. Every computed field is stale.
    DayChanged { removed: usize },
}

pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&StoreEvent) + Send>;

/// Authoritative deadline collection with best-effort persistence.
pub struct DeadlineStore<S, C = SystemClock, G = RandomIdGenerator> {
    kv: S,
    clock: C,
    ids: G,
    deadlines: Vec<Deadline>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
    timer: Option<MidnightTimer>,
}

impl<S: KeyValueStore> DeadlineStore<S> {
    /// Loads with the system clock and random ids.
    pub fn open(kv: S) -> Self {
        Self::load(kv, SystemClock, RandomIdGenerator)
    }
}

impl<S, C, G> DeadlineStore<S, C, G>
where
    S: KeyValueStore,
    C: Clock,
    G: IdGenerator,
{
    /// Loads the persisted collection, falling back to seed data, then runs
    /// the overdue sweep.
    ///
    /// A missing or unreadable blob never fails the load.
    pub fn load(kv: S, clock: C, mut ids: G) -> Self {
        let deadlines = match load_deadlines(&kv) {
            Ok(Some(deadlines)) => {
                info!(
                    "event=store_load module=store status=ok source=persisted count={}",
                    deadlines.len()
                );
                deadlines
            }
            Ok(None) => {
                info!("event=store_load module=store status=ok source=seed reason=absent");
                seed_deadlines(clock.today(), &mut ids)
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=degraded source=seed reason=decode_failed error={}",
                    err
                );
                seed_deadlines(clock.today(), &mut ids)
            }
        };

        let mut store = Self {
            kv,
            clock,
            ids,
            deadlines,
            listeners: Vec::new(),
            next_subscription: 1,
            timer: None,
        };
        store.cleanup_overdue();
        store
    }

    /// Appends a deadline with a fresh id and persists.
    ///
    /// Returns `None` (no record created) when `name` is blank or the
    /// generated id is already live.
    pub fn add(&mut self, name: &str, date: NaiveDate) -> Option<DeadlineId> {
        let name = match normalize_name(name) {
            Ok(name) => name,
            Err(err) => {
                debug!("event=deadline_add module=store status=rejected reason={err}");
                return None;
            }
        };

        let id = self.ids.next_id();
        if self.contains(id) {
            warn!("event=deadline_add module=store status=rejected reason=id_collision id={id}");
            return None;
        }
        let deadline = match Deadline::with_id(id, name, date) {
            Ok(deadline) => deadline,
            Err(err) => {
                warn!("event=deadline_add module=store status=rejected reason={err}");
                return None;
            }
        };

        self.deadlines.push(deadline);
        info!("event=deadline_add module=store status=ok id={id} date={date}");
        self.commit();
        Some(id)
    }

    /// Adds a deadline from separately entered month and day in the current
    /// local year.
    ///
    /// Out-of-range month or day is a no-op.
    pub fn add_month_day(&mut self, name: &str, month: u32, day: u32) -> Option<DeadlineId> {
        match resolve_month_day_in_year_of(self.clock.today(), month, day) {
            Ok(date) => self.add(name, date),
            Err(err) => {
                debug!("event=deadline_add module=store status=rejected reason={err}");
                None
            }
        }
    }

    /// Removes the record with `id`. Returns whether one was removed.
    pub fn remove(&mut self, id: DeadlineId) -> bool {
        let before = self.deadlines.len();
        self.deadlines.retain(|deadline| deadline.id != id);
        if self.deadlines.len() == before {
            debug!("event=deadline_remove module=store status=noop id={id}");
            return false;
        }
        info!("event=deadline_remove module=store status=ok id={id}");
        self.commit();
        true
    }

    /// Removes the record whose id matches `deadline.id`.
    pub fn remove_deadline(&mut self, deadline: &Deadline) -> bool {
        self.remove(deadline.id)
    }

    /// Replaces the name of the record with `id`.
    ///
    /// Blank names and unknown ids are no-ops. The date is never changed.
    pub fn rename(&mut self, id: DeadlineId, new_name: &str) -> bool {
        let Ok(new_name) = normalize_name(new_name) else {
            debug!("event=deadline_rename module=store status=rejected reason=empty_name id={id}");
            return false;
        };
        let Some(deadline) = self.deadlines.iter_mut().find(|deadline| deadline.id == id) else {
            debug!("event=deadline_rename module=store status=noop id={id}");
            return false;
        };

        deadline.name = new_name;
        info!("event=deadline_rename module=store status=ok id={id}");
        self.commit();
        true
    }

    /// All records ordered by ascending days-until, then case-insensitive
    /// name.
    pub fn sorted_view(&self) -> Vec<DeadlineView> {
        let today = self.clock.today();
        let mut rows = self
            .deadlines
            .iter()
            .map(|deadline| {
                let days = days_until(today, deadline.date);
                DeadlineView {
                    id: deadline.id,
                    name: deadline.name.clone(),
                    date: deadline.date,
                    days_until: days,
                    label: days_until_text(days),
                }
            })
            .collect::<Vec<_>>();

        rows.sort_by(|a, b| {
            a.days_until
                .cmp(&b.days_until)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        rows
    }

    /// Removes every record overdue by more than `OVERDUE_GRACE_DAYS`.
    ///
    /// Returns the number of removed records; persists only when non-zero.
    pub fn cleanup_overdue(&mut self) -> usize {
        let today = self.clock.today();
        let before = self.deadlines.len();
        self.deadlines
            .retain(|deadline| days_until(today, deadline.date) >= -OVERDUE_GRACE_DAYS);
        let removed = before - self.deadlines.len();

        if removed > 0 {
            info!("event=store_cleanup module=store status=ok removed={removed} today={today}");
            self.commit();
        }
        removed
    }

    /// Host hook for a local-midnight crossing.
    ///
    /// Runs the overdue sweep, then tells subscribers every computed field
    /// is stale.
    pub fn day_changed(&mut self) -> usize {
        let removed = self.cleanup_overdue();
        self.notify(StoreEvent::DayChanged { removed });
        removed
    }

    /// Registers a change listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StoreEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether a listener was registered under `id`.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Installs `timer` as the single midnight timer, cancelling any
    /// previously attached one.
    pub fn attach_timer(&mut self, timer: MidnightTimer) {
        if let Some(mut previous) = self.timer.replace(timer) {
            previous.cancel();
        }
    }

    pub fn has_timer(&self) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|timer| timer.is_running())
    }

    /// Teardown hook: releases the midnight timer.
    pub fn shutdown(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
        info!(
            "event=store_shutdown module=store status=ok count={}",
            self.deadlines.len()
        );
    }

    pub fn get(&self, id: DeadlineId) -> Option<&Deadline> {
        self.deadlines.iter().find(|deadline| deadline.id == id)
    }

    /// Records in insertion order.
    pub fn deadlines(&self) -> &[Deadline] {
        &self.deadlines
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn key_value_store(&self) -> &S {
        &self.kv
    }

    fn contains(&self, id: DeadlineId) -> bool {
        self.deadlines.iter().any(|deadline| deadline.id == id)
    }

    fn commit(&mut self) {
        self.persist();
        self.notify(StoreEvent::Changed);
    }

    fn persist(&self) {
        if let Err(err) = save_deadlines(&self.kv, &self.deadlines) {
            warn!(
                "event=store_save module=store status=error count={} error={}",
                self.deadlines.len(),
                err
            );
        }
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

impl<S, C, G> DeadlineStore<S, C, G>
where
    S: KeyValueStore,
    C: Clock + Clone + Send + 'static,
    G: IdGenerator,
{
    /// Starts a midnight timer on the store's clock and attaches it.
    ///
    /// `on_tick` runs on the timer thread; hosts forward it to whoever owns
    /// the store, which then calls `day_changed()`.
    pub fn start_midnight_timer(
        &mut self,
        on_tick: impl FnMut(NaiveDate) + Send + 'static,
    ) -> std::io::Result<()> {
        let timer = MidnightTimer::start(self.clock.clone(), on_tick)?;
        self.attach_timer(timer);
        Ok(())
    }
}

fn seed_deadlines(today: NaiveDate, ids: &mut impl IdGenerator) -> Vec<Deadline> {
    SEED_DEADLINES
        .iter()
        .filter_map(|(name, offset)| {
            let date = today.checked_add_signed(Duration::days(*offset))?;
            Deadline::with_id(ids.next_id(), name, date).ok()
        })
        .collect()
}
