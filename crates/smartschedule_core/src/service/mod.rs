//! Core use-case services.
//!
//! # Responsibility
//! - Derive display numbers from task subsets.
//! - Hold per-session state (selected date, theme) on top of the store.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod daily_aggregator;
pub mod planner_session;
pub mod theme_service;
