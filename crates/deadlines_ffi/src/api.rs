//! FFI use-case API for the menu-bar presentation layer.
//!
//! # Responsibility
//! - Expose the deadline store's read/write operations as sync calls.
//! - Own the process-wide store and its midnight timer.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - The store is opened lazily on first use and released by
//!   `deadlines_shutdown`.
//! - Timer ticks never reopen a store that has been shut down.

use deadlines_core::db::open_db;
use deadlines_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    resolve_month_day, CoreConfig, DeadlineId, DeadlineStore, DeadlineView, SqliteKeyValueStore,
};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};
use uuid::Uuid;

type BridgeStore = DeadlineStore<SqliteKeyValueStore>;

static STORE: Mutex<Option<BridgeStore>> = Mutex::new(None);
static CONFIG: OnceLock<CoreConfig> = OnceLock::new();
static CHANGES_PENDING: AtomicBool = AtomicBool::new(false);

/// Minimal health-check API for bridge smoke tests.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`, case-insensitive.
/// - `log_dir`: absolute directory for rolling log files.
/// - Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One rendered row of the deadline list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineItem {
    /// Stable deadline id in string form.
    pub id: String,
    pub name: String,
    /// Calendar date as `YYYY-MM-DD`.
    pub date: String,
    /// Signed whole days from today; negative means overdue.
    pub days_until: i64,
    /// Display label such as `Today!` or `3 days`.
    pub label: String,
}

/// Result envelope for mutating calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineActionResponse {
    /// `false` only when the bridge itself failed (bad id text, store
    /// unavailable).
    pub ok: bool,
    /// Whether the collection changed.
    pub changed: bool,
    /// Created deadline id for successful adds.
    pub deadline_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl DeadlineActionResponse {
    fn changed(message: impl Into<String>, deadline_id: Option<DeadlineId>) -> Self {
        Self {
            ok: true,
            changed: true,
            deadline_id: deadline_id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed: false,
            deadline_id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            deadline_id: None,
            message: message.into(),
        }
    }
}

/// Lists deadlines in display order.
///
/// # FFI contract
/// - Sync call, DB-backed on first use.
/// - Returns an empty list when the store cannot be opened.
#[flutter_rust_bridge::frb(sync)]
pub fn deadlines_list() -> Vec<DeadlineItem> {
    match with_store(|store| store.sorted_view()) {
        Ok(rows) => rows.into_iter().map(to_deadline_item).collect(),
        Err(err) => {
            error!("event=ffi_list module=ffi status=error error={err}");
            Vec::new()
        }
    }
}

/// Adds a deadline on an explicit calendar date.
#[flutter_rust_bridge::frb(sync)]
pub fn deadline_add(name: String, year: i32, month: u32, day: u32) -> DeadlineActionResponse {
    let date = match resolve_month_day(year, month, day) {
        Ok(date) => date,
        Err(err) => return DeadlineActionResponse::unchanged(format!("Not added: {err}.")),
    };
    respond_to_add(with_store(|store| store.add(&name, date)))
}

/// Adds a deadline from month/day input in the current local year.
#[flutter_rust_bridge::frb(sync)]
pub fn deadline_add_month_day(name: String, month: u32, day: u32) -> DeadlineActionResponse {
    respond_to_add(with_store(|store| store.add_month_day(&name, month, day)))
}

/// Removes a deadline by id. Unknown ids are a successful no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn deadline_remove(id: String) -> DeadlineActionResponse {
    let Some(id) = parse_id(&id) else {
        return DeadlineActionResponse::failure(format!("deadline_remove failed: invalid id `{id}`"));
    };
    match with_store(|store| store.remove(id)) {
        Ok(true) => DeadlineActionResponse::changed("Deadline removed.", None),
        Ok(false) => DeadlineActionResponse::unchanged("No deadline with that id."),
        Err(err) => DeadlineActionResponse::failure(format!("deadline_remove failed: {err}")),
    }
}

/// Renames a deadline by id. Blank names and unknown ids are no-ops.
#[flutter_rust_bridge::frb(sync)]
pub fn deadline_rename(id: String, name: String) -> DeadlineActionResponse {
    let Some(id) = parse_id(&id) else {
        return DeadlineActionResponse::failure(format!("deadline_rename failed: invalid id `{id}`"));
    };
    match with_store(|store| store.rename(id, &name)) {
        Ok(true) => DeadlineActionResponse::changed("Deadline renamed.", None),
        Ok(false) => DeadlineActionResponse::unchanged("Nothing renamed."),
        Err(err) => DeadlineActionResponse::failure(format!("deadline_rename failed: {err}")),
    }
}

/// Day-rollover hook for hosts with their own midnight signal.
///
/// Returns the number of purged deadlines.
#[flutter_rust_bridge::frb(sync)]
pub fn deadlines_day_changed() -> u32 {
    match with_store(|store| store.day_changed()) {
        Ok(removed) => u32::try_from(removed).unwrap_or(u32::MAX),
        Err(err) => {
            error!("event=ffi_day_changed module=ffi status=error error={err}");
            0
        }
    }
}

/// Returns `true` once after any store change since the previous call.
///
/// Hosts poll this to know `deadlines_list` must be re-read.
#[flutter_rust_bridge::frb(sync)]
pub fn deadlines_poll_changed() -> bool {
    CHANGES_PENDING.swap(false, Ordering::AcqRel)
}

/// Teardown hook: releases the store and its midnight timer.
///
/// Safe to call repeatedly; a later call to any other API reopens the store.
#[flutter_rust_bridge::frb(sync)]
pub fn deadlines_shutdown() {
    let taken = lock_store().take();
    if let Some(mut store) = taken {
        store.shutdown();
    }
}

fn respond_to_add(result: Result<Option<DeadlineId>, String>) -> DeadlineActionResponse {
    match result {
        Ok(Some(id)) => DeadlineActionResponse::changed("Deadline added.", Some(id)),
        Ok(None) => DeadlineActionResponse::unchanged("Not added: name or date is invalid."),
        Err(err) => DeadlineActionResponse::failure(format!("deadline_add failed: {err}")),
    }
}

fn with_store<T>(f: impl FnOnce(&mut BridgeStore) -> T) -> Result<T, String> {
    let mut guard = lock_store();
    if guard.is_none() {
        *guard = Some(open_bridge_store()?);
    }
    match guard.as_mut() {
        Some(store) => Ok(f(store)),
        None => Err("deadline store unavailable".to_string()),
    }
}

fn lock_store() -> MutexGuard<'static, Option<BridgeStore>> {
    STORE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn open_bridge_store() -> Result<BridgeStore, String> {
    let config = CONFIG.get_or_init(CoreConfig::from_env);
    let conn = open_db(&config.db_path).map_err(|err| format!("deadline DB open failed: {err}"))?;

    let mut store = DeadlineStore::open(SqliteKeyValueStore::new(conn));
    store.subscribe(|_| CHANGES_PENDING.store(true, Ordering::Release));
    if let Err(err) = store.start_midnight_timer(|_| on_midnight_tick()) {
        error!("event=ffi_timer module=ffi status=error error={err}");
    }
    info!(
        "event=ffi_store_open module=ffi status=ok count={}",
        store.len()
    );
    Ok(store)
}

fn on_midnight_tick() {
    // Runs on the timer thread; a shut-down store must stay closed.
    if let Some(store) = lock_store().as_mut() {
        store.day_changed();
    }
}

fn parse_id(raw: &str) -> Option<DeadlineId> {
    Uuid::parse_str(raw.trim()).ok().filter(|id| !id.is_nil())
}

fn to_deadline_item(row: DeadlineView) -> DeadlineItem {
    DeadlineItem {
        id: row.id.to_string(),
        name: row.name,
        date: row.date.format("%Y-%m-%d").to_string(),
        days_until: row.days_until,
        label: row.label,
    }
}
