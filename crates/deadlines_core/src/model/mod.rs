//! Domain model for tracked deadlines.
//!
//! # Responsibility
//! - Define the canonical deadline record owned by the store.
//! - Validate record shape at construction and deserialization time.
//!
//! # Invariants
//! - Every deadline is identified by a stable, non-nil `DeadlineId`.
//! - Names are never empty.

pub mod deadline;
