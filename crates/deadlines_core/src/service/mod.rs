//! Use-case layer over the persisted deadline collection.
//!
//! # Responsibility
//! - Own the in-memory collection and its mutation rules.
//! - Keep presentation layers decoupled from storage details.

pub mod deadline_store;
