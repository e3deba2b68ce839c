//! Core domain logic for SmartSchedule, a single-user daily task planner.
//! This crate is the single source of truth for task invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{KeyMigration, PlannerConfig, DEFAULT_DAILY_TARGET_HOURS};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::date::{format_day, is_storable_day, parse_day, shift_day};
pub use model::task::{parse_duration, Task, TaskId, TaskValidationError};
pub use repo::sanitize::sanitize_task;
pub use repo::task_store::{LoadReport, TaskStore};
pub use service::daily_aggregator::{
    category_breakdown, category_label, format_hours, progress_label, progress_percent,
    progress_ratio, summarize_day, total_hours, CategoryTotal, DailySummary,
    UNCATEGORIZED_LABEL,
};
pub use service::planner_session::PlannerSession;
pub use service::theme_service::{ThemeChoice, ThemeError, ThemeService};
pub use storage::{KvStore, MemoryKvStore, SqliteKvStore, StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
