//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the planner as plain request/response calls via FRB.
//! - Translate core results into display-ready envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Tasks are loaded once per process into `PLANNER_STATE`; later calls
//!   reuse that in-memory store, which stays authoritative even when a
//!   write fails.
//! - Every call holds the `PLANNER_STATE` lock for its whole duration.
//! - Malformed date input resolves to today, matching the load path.

use chrono::NaiveDate;
use log::warn;
use smartschedule_core::db::open_db;
use rusqlite::Connection;
use smartschedule_core::{
    category_label, core_version as core_version_inner, format_day, format_hours,
    init_logging as init_logging_inner, parse_day, parse_duration, progress_label, shift_day,
    summarize_day, Clock, DailySummary, PlannerConfig, SqliteKvStore, SystemClock, Task,
    TaskStore, ThemeChoice, ThemeService,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const PLANNER_DB_FILE_NAME: &str = "smartschedule.sqlite3";
const PLANNER_DB_PATH_ENV: &str = "SMARTSCHEDULE_DB_PATH";
static PLANNER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static PLANNER_STATE: Mutex<Option<PlannerState>> = Mutex::new(None);

type FfiTaskStore = TaskStore<SqliteKvStore<Connection>, SystemClock>;

/// Process-wide planner session: the loaded task store and its config.
struct PlannerState {
    store: FfiTaskStore,
    config: PlannerConfig,
}

impl PlannerState {
    fn open() -> Result<Self, String> {
        let conn = open_db(resolve_planner_db_path())
            .map_err(|err| format!("planner DB open failed: {err}"))?;
        let config = PlannerConfig::from_env();
        let store = TaskStore::open(SqliteKvStore::new(conn), SystemClock, &config);
        Ok(Self { store, config })
    }
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One task row of the day view.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerTaskItem {
    pub task_id: String,
    pub name: String,
    /// Category, or `Uncategorized` when empty.
    pub category_label: String,
    pub duration: f64,
    /// Display form, e.g. `2` or `1.50`.
    pub duration_label: String,
}

/// One category row of the day summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerCategoryItem {
    pub label: String,
    pub hours: f64,
    pub hours_label: String,
}

/// Everything the day screen renders for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerDayView {
    /// Whether the view was computed from storage.
    pub ok: bool,
    /// Resolved day in `YYYY-MM-DD` form.
    pub date: String,
    /// Tasks in insertion order.
    pub tasks: Vec<PlannerTaskItem>,
    pub total_hours: f64,
    pub total_label: String,
    pub target_hours: f64,
    /// Progress toward the daily target, within `[0, 1]`.
    pub progress_ratio: f64,
    pub progress_percent: f64,
    pub progress_label: String,
    pub categories: Vec<PlannerCategoryItem>,
    /// Human-readable diagnostics.
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerActionResponse {
    /// Whether the operation was accepted.
    pub ok: bool,
    /// Created task id, when a task was created.
    pub task_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl PlannerActionResponse {
    fn success(message: impl Into<String>, task_id: Option<String>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Returns today's local date as `YYYY-MM-DD`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_today() -> String {
    format_day(SystemClock.today())
}

/// Moves `date` by `days` (negative for past days).
///
/// # FFI contract
/// - Pure; no storage access.
/// - Malformed `date` is treated as today.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_shift_date(date: String, days: i64) -> String {
    let base = resolve_day(&date, SystemClock.today());
    format_day(shift_day(base, days))
}

/// Computes the day view for `date`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; storage failures yield an empty view with `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_day_view(date: String) -> PlannerDayView {
    let result = with_task_store(|store, config| {
        let day = resolve_day(&date, store.today());
        summarize_day(day, store.query_by_date(day), config.daily_target_hours)
    });

    match result {
        Ok(summary) => to_day_view(summary),
        Err(err) => {
            let day = resolve_day(&date, SystemClock.today());
            let empty = summarize_day(
                day,
                std::iter::empty::<&Task>(),
                PlannerConfig::from_env().daily_target_hours,
            );
            PlannerDayView {
                ok: false,
                message: format!("planner_day_view failed: {err}"),
                ..to_day_view(empty)
            }
        }
    }
}

/// Creates a task from form input.
///
/// Input semantics:
/// - `duration`: raw text of the hours field; must read as a number `> 0`.
/// - `date`: `YYYY-MM-DD`; malformed input means today.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Rejected input returns `ok=false` and leaves storage untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_create_task(
    name: String,
    category: String,
    duration: String,
    date: String,
) -> PlannerActionResponse {
    let hours = match parse_duration(&duration) {
        Ok(hours) => hours,
        Err(err) => return PlannerActionResponse::failure(err.to_string()),
    };

    let result = with_task_store(|store, _| {
        let day = resolve_day(&date, store.today());
        store.create(&name, &category, hours, day)
    });

    match result {
        Ok(Ok(task)) => PlannerActionResponse::success("Task added.", Some(task.id)),
        Ok(Err(err)) => PlannerActionResponse::failure(err.to_string()),
        Err(err) => PlannerActionResponse::failure(format!("planner_create_task failed: {err}")),
    }
}

/// Deletes one task by id.
///
/// # FFI contract
/// - Unknown ids are a successful no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_task(task_id: String) -> PlannerActionResponse {
    match with_task_store(|store, _| store.delete_by_id(task_id.trim())) {
        Ok(true) => PlannerActionResponse::success("Task removed.", None),
        Ok(false) => PlannerActionResponse::success("Task not found; nothing removed.", None),
        Err(err) => PlannerActionResponse::failure(format!("planner_delete_task failed: {err}")),
    }
}

/// Deletes every task planned on `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_clear_day(date: String) -> PlannerActionResponse {
    let result = with_task_store(|store, _| {
        let day = resolve_day(&date, store.today());
        store.clear_for_date(day)
    });

    match result {
        Ok(removed) => PlannerActionResponse::success(format!("Removed {removed} task(s)."), None),
        Err(err) => PlannerActionResponse::failure(format!("planner_clear_day failed: {err}")),
    }
}

/// Returns the effective theme (`dark|light`).
///
/// Falls back to the system preference when nothing explicit is stored or
/// storage is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_resolve(system_prefers_dark: bool) -> String {
    let choice = with_theme_service(|themes| themes.resolve(system_prefers_dark))
        .unwrap_or_else(|err| {
            warn!("event=theme_resolve module=ffi status=error error={err}");
            ThemeChoice::from_system(system_prefers_dark)
        });
    choice.as_str().to_string()
}

/// Stores an explicit theme. `system` clears the explicit choice.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_set(choice: String) -> String {
    let result = if choice.trim().eq_ignore_ascii_case("system") {
        with_theme_service(|themes| themes.clear_choice().map_err(|err| err.to_string()))
    } else {
        match choice.parse::<ThemeChoice>() {
            Ok(parsed) => with_theme_service(|themes| {
                themes.set_choice(parsed).map_err(|err| err.to_string())
            }),
            Err(err) => return err.to_string(),
        }
    };

    match result {
        Ok(Ok(())) => String::new(),
        Ok(Err(err)) | Err(err) => err,
    }
}

fn resolve_day(raw: &str, today: NaiveDate) -> NaiveDate {
    parse_day(raw).unwrap_or(today)
}

fn resolve_planner_db_path() -> PathBuf {
    PLANNER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(PLANNER_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PLANNER_DB_FILE_NAME)
        })
        .clone()
}

fn with_planner_state<T>(f: impl FnOnce(&mut PlannerState) -> T) -> Result<T, String> {
    let mut guard = PLANNER_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    if guard.is_none() {
        *guard = Some(PlannerState::open()?);
    }
    guard
        .as_mut()
        .map(f)
        .ok_or_else(|| "planner state unavailable".to_string())
}

fn with_task_store<T>(
    f: impl FnOnce(&mut FfiTaskStore, &PlannerConfig) -> T,
) -> Result<T, String> {
    with_planner_state(|state| f(&mut state.store, &state.config))
}

fn with_theme_service<T>(
    f: impl FnOnce(&ThemeService<&SqliteKvStore<Connection>>) -> T,
) -> Result<T, String> {
    with_planner_state(|state| {
        let themes = ThemeService::new(state.store.storage(), state.config.theme_key.as_str());
        f(&themes)
    })
}

fn to_day_view(summary: DailySummary) -> PlannerDayView {
    let percent = summary.progress_percent;
    PlannerDayView {
        ok: true,
        date: format_day(summary.date),
        tasks: summary.tasks.into_iter().map(to_task_item).collect(),
        total_hours: summary.total_hours,
        total_label: format_hours(summary.total_hours),
        target_hours: summary.target_hours,
        progress_ratio: summary.progress_ratio,
        progress_percent: percent,
        progress_label: progress_label(percent),
        categories: summary
            .categories
            .into_iter()
            .map(|category| PlannerCategoryItem {
                hours_label: format_hours(category.hours),
                label: category.label,
                hours: category.hours,
            })
            .collect(),
        message: String::new(),
    }
}

fn to_task_item(task: Task) -> PlannerTaskItem {
    PlannerTaskItem {
        category_label: category_label(&task.category).to_string(),
        duration_label: format_hours(task.duration),
        task_id: task.id,
        name: task.name,
        duration: task.duration,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, planner_clear_day, planner_create_task, planner_day_view,
        planner_delete_task, planner_shift_date, planner_today, theme_resolve, theme_set,
        PLANNER_DB_FILE_NAME, PLANNER_DB_PATH,
    };
    use smartschedule_core::config::TASKS_KEY;
    use smartschedule_core::db::open_db;
    use smartschedule_core::{KvStore, SqliteKvStore};
    use std::path::PathBuf;
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn shift_date_navigates_and_defaults_to_today() {
        assert_eq!(planner_shift_date("2024-02-28".to_string(), 1), "2024-02-29");
        assert_eq!(planner_shift_date("2024-03-01".to_string(), -1), "2024-02-29");
        assert_eq!(planner_shift_date("garbage".to_string(), 0), planner_today());
        assert_eq!(planner_shift_date("2024-01-01".to_string(), 3_000_000), "2024-01-01");
    }

    #[test]
    fn create_then_view_reports_totals_and_categories() {
        use_test_db();
        let date = "2091-05-01".to_string();
        assert!(planner_clear_day(date.clone()).ok);

        let report = planner_create_task(
            unique_token("Write report"),
            "Work".to_string(),
            "2".to_string(),
            date.clone(),
        );
        assert!(report.ok, "{}", report.message);
        let gym = planner_create_task(
            unique_token("Gym"),
            String::new(),
            " 1 ".to_string(),
            date.clone(),
        );
        assert!(gym.ok, "{}", gym.message);

        let view = planner_day_view(date);
        assert!(view.ok, "{}", view.message);
        assert_eq!(view.tasks.len(), 2);
        assert_eq!(view.tasks[0].task_id, report.task_id.unwrap());
        assert_eq!(view.tasks[1].category_label, "Uncategorized");
        assert_eq!(view.total_label, "3");
        assert_eq!(view.progress_ratio, 3.0 / view.target_hours);
        assert_eq!(view.categories.len(), 2);
        assert_eq!(view.categories[0].label, "Work");
    }

    #[test]
    fn create_rejects_invalid_form_input() {
        use_test_db();
        let date = "2091-05-02".to_string();
        assert!(planner_clear_day(date.clone()).ok);

        let empty_name = planner_create_task(
            "  ".to_string(),
            "Work".to_string(),
            "2".to_string(),
            date.clone(),
        );
        assert!(!empty_name.ok);
        assert!(empty_name.message.contains("name"));

        let bad_duration = planner_create_task(
            "X".to_string(),
            String::new(),
            "abc".to_string(),
            date.clone(),
        );
        assert!(!bad_duration.ok);
        assert!(bad_duration.task_id.is_none());

        assert!(planner_day_view(date).tasks.is_empty());
    }

    #[test]
    fn delete_and_clear_only_touch_their_targets() {
        use_test_db();
        let day_a = "2091-05-03".to_string();
        let day_b = "2091-05-04".to_string();
        assert!(planner_clear_day(day_a.clone()).ok);
        assert!(planner_clear_day(day_b.clone()).ok);

        let first = create_hour(&unique_token("a"), &day_a);
        create_hour(&unique_token("b"), &day_a);
        create_hour(&unique_token("c"), &day_b);

        let removed = planner_delete_task(first.task_id.unwrap());
        assert!(removed.ok);
        assert_eq!(planner_day_view(day_a.clone()).tasks.len(), 1);

        let missing = planner_delete_task("no-such-task".to_string());
        assert!(missing.ok);
        assert!(missing.message.contains("nothing removed"));

        let cleared = planner_clear_day(day_a.clone());
        assert_eq!(cleared.message, "Removed 1 task(s).");
        assert!(planner_day_view(day_a).tasks.is_empty());
        assert_eq!(planner_day_view(day_b).tasks.len(), 1);
    }

    #[test]
    fn session_is_loaded_once_and_memory_stays_authoritative() {
        let db_path = use_test_db();
        let date = "2091-05-05".to_string();
        assert!(planner_clear_day(date.clone()).ok);
        let created = create_hour(&unique_token("kept"), &date);
        assert!(created.ok, "{}", created.message);

        let before = {
            let conn = open_db(&db_path).unwrap();
            let storage = SqliteKvStore::new(&conn);
            let before = storage.get(TASKS_KEY).unwrap();
            storage.set(TASKS_KEY, "[]").unwrap();
            before
        };
        assert!(before.is_some());

        let view = planner_day_view(date);
        assert!(view.ok, "{}", view.message);
        assert_eq!(view.tasks.len(), 1);
        assert_eq!(view.tasks[0].task_id, created.task_id.unwrap());
    }

    #[test]
    fn theme_set_validates_and_system_clears() {
        use_test_db();
        assert!(theme_set("purple".to_string()).contains("unknown theme"));
        assert_eq!(theme_set("system".to_string()), "");
        assert_eq!(theme_resolve(true), "dark");
        assert_eq!(theme_resolve(false), "light");
    }

    /// Points the process-wide DB path at a private temp directory.
    fn use_test_db() -> PathBuf {
        static TEST_DB_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
        let dir = TEST_DB_DIR.get_or_init(|| tempfile::tempdir().expect("create temp dir"));
        PLANNER_DB_PATH
            .get_or_init(|| dir.path().join(PLANNER_DB_FILE_NAME))
            .clone()
    }

    fn create_hour(name: &str, date: &str) -> super::PlannerActionResponse {
        planner_create_task(
            name.to_string(),
            String::new(),
            "1".to_string(),
            date.to_string(),
        )
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
