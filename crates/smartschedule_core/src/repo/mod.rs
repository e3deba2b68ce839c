//! Task store and record sanitization.
//!
//! # Responsibility
//! - Own the canonical task collection and its persistence round-trip.
//! - Keep blob encoding details inside the store boundary.
//!
//! # Invariants
//! - Every entry path (load and create) validates before a task is held.
//! - The collection is mutated only through `TaskStore` methods.

pub mod sanitize;
pub mod task_store;
