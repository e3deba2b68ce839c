//! Flutter bridge for SmartSchedule core.

pub mod api;
