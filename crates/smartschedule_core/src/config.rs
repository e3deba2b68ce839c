//! Planner configuration.
//!
//! # Responsibility
//! - Hold storage keys, legacy key migrations and the daily hour target.
//! - Resolve overrides from the process environment for front-ends.
//!
//! # Invariants
//! - `daily_target_hours` produced by `parse_daily_target` is finite and `> 0`.
//! - `key_migrations` are applied in declaration order.

use log::warn;

/// Hours a day counts as fully planned. Progress is measured against it.
pub const DEFAULT_DAILY_TARGET_HOURS: f64 = 8.0;
/// Storage key holding the current task blob.
pub const TASKS_KEY: &str = "smartschedule.tasks";
/// Storage key used by earlier releases for the task blob.
pub const LEGACY_TASKS_KEY: &str = "smartschedule-tasks";
/// Storage key holding the explicit theme choice.
pub const THEME_KEY: &str = "smartschedule.theme";
/// Environment override for the daily target.
pub const DAILY_TARGET_ENV: &str = "SMARTSCHEDULE_DAILY_TARGET_HOURS";

/// One-time move of a stored blob from an old key to its replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMigration {
    pub from: String,
    pub to: String,
}

impl KeyMigration {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub daily_target_hours: f64,
    pub tasks_key: String,
    pub key_migrations: Vec<KeyMigration>,
    pub theme_key: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            daily_target_hours: DEFAULT_DAILY_TARGET_HOURS,
            tasks_key: TASKS_KEY.to_string(),
            key_migrations: vec![KeyMigration::new(LEGACY_TASKS_KEY, TASKS_KEY)],
            theme_key: THEME_KEY.to_string(),
        }
    }
}

impl PlannerConfig {
    /// Default config with environment overrides applied.
    ///
    /// An invalid `SMARTSCHEDULE_DAILY_TARGET_HOURS` is logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(DAILY_TARGET_ENV) {
            match parse_daily_target(&raw) {
                Ok(hours) => config.daily_target_hours = hours,
                Err(err) => warn!(
                    "event=config_load module=config status=ignored key={} error={}",
                    DAILY_TARGET_ENV, err
                ),
            }
        }
        config
    }
}

/// Parses a daily target in hours.
///
/// # Errors
/// - Returns an error when the value is not a finite number `> 0`.
pub fn parse_daily_target(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let hours = trimmed
        .parse::<f64>()
        .map_err(|_| format!("daily target `{trimmed}` is not a number"))?;
    if !hours.is_finite() || hours <= 0.0 {
        return Err(format!("daily target must be > 0 hours, got `{trimmed}`"));
    }
    Ok(hours)
}
