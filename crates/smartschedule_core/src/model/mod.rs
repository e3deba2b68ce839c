//! Domain model for planned tasks.
//!
//! # Responsibility
//! - Define the single persisted entity (`Task`) and its validation rules.
//! - Own calendar-day parsing and formatting shared by every layer.
//!
//! # Invariants
//! - A constructed `Task` always has a non-empty name and a finite,
//!   strictly positive duration.

pub mod date;
pub mod task;
