//! Core logic for the deadlines menu-bar tracker.
//! Owns day-count arithmetic and the persisted deadline collection; UI hosts
//! call in through `DeadlineStore`.

pub mod config;
pub mod days;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use config::CoreConfig;
pub use days::{
    days_until, days_until_at, days_until_text, duration_until_next_midnight, Clock, ManualClock,
    SystemClock,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::deadline::{resolve_month_day, Deadline, DeadlineId, DeadlineValidationError};
pub use repo::deadline_repo::{load_deadlines, save_deadlines, DEADLINES_KEY};
pub use repo::kv_store::{KeyValueStore, SqliteKeyValueStore};
pub use repo::{RepoError, RepoResult};
pub use schedule::MidnightTimer;
pub use service::deadline_store::{
    DeadlineStore, DeadlineView, IdGenerator, RandomIdGenerator, SequentialIdGenerator,
    StoreEvent, SubscriptionId, OVERDUE_GRACE_DAYS, SEED_DEADLINES,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
