//! Canonical in-memory task collection with write-through persistence.
//!
//! # Responsibility
//! - Load, sanitize and self-heal the persisted task blob.
//! - Apply create/delete/clear mutations and persist after each one.
//! - Answer per-day queries in insertion order.
//!
//! # Invariants
//! - Every task held in memory satisfies `Task::validate()`.
//! - Insertion order is display order; the store never re-sorts.
//! - Storage failures are logged and swallowed; memory stays authoritative.
//! - Task names and categories never appear in logs.

use crate::clock::Clock;
use crate::config::{KeyMigration, PlannerConfig};
use crate::model::task::{new_task_id, Task, TaskValidationError};
use crate::repo::sanitize::sanitize_task;
use crate::storage::KvStore;
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use serde_json::error::Category;
use serde_json::value::RawValue;
use serde_json::Value;
use std::collections::HashSet;

/// Counters describing one `load` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Legacy keys whose content moved to (or was superseded by) a new key.
    pub migrated_keys: usize,
    /// Valid tasks now held in memory.
    pub loaded: usize,
    /// Records discarded by sanitization.
    pub dropped: usize,
    /// Records whose duplicate id was replaced by a fresh one.
    pub reassigned_ids: usize,
}

/// Single source of truth for planned tasks.
pub struct TaskStore<S: KvStore, C: Clock> {
    storage: S,
    clock: C,
    tasks_key: String,
    key_migrations: Vec<KeyMigration>,
    tasks: Vec<Task>,
}

impl<S: KvStore, C: Clock> TaskStore<S, C> {
    /// Creates an empty, not-yet-loaded store.
    pub fn new(storage: S, clock: C, config: &PlannerConfig) -> Self {
        Self {
            storage,
            clock,
            tasks_key: config.tasks_key.clone(),
            key_migrations: config.key_migrations.clone(),
            tasks: Vec::new(),
        }
    }

    /// Creates a store and immediately loads persisted tasks.
    pub fn open(storage: S, clock: C, config: &PlannerConfig) -> Self {
        let mut store = Self::new(storage, clock, config);
        store.load();
        store
    }

    /// Replaces the in-memory collection with the sanitized persisted blob.
    ///
    /// Runs the legacy key migrations first. A missing, unreadable or
    /// non-array blob yields an empty collection and is left in storage as
    /// is. When an array was read, records that fail to decode or sanitize
    /// are dropped one by one and the cleaned list is written back.
    pub fn load(&mut self) -> LoadReport {
        let mut report = LoadReport {
            migrated_keys: self.migrate_legacy_keys(),
            ..LoadReport::default()
        };
        self.tasks.clear();

        let raw = match self.storage.get(&self.tasks_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=task_store_load module=repo status=ok source=empty loaded=0");
                return report;
            }
            Err(err) => {
                error!(
                    "event=task_store_load module=repo status=error error_code=storage_read_failed error={}",
                    err
                );
                return report;
            }
        };

        // Decode per element: a record with e.g. an out-of-range number only
        // drops itself.
        let records = match serde_json::from_str::<Vec<Box<RawValue>>>(&raw) {
            Ok(records) => records,
            Err(err) => {
                let reason = match err.classify() {
                    Category::Data => "not_an_array",
                    _ => "invalid_json",
                };
                warn!(
                    "event=task_store_load module=repo status=degraded reason={} error={}",
                    reason, err
                );
                return report;
            }
        };

        let today = self.clock.today();
        let mut seen_ids = HashSet::new();
        for record in &records {
            let sanitized = serde_json::from_str::<Value>(record.get())
                .ok()
                .and_then(|value| sanitize_task(&value, today));
            let Some(mut task) = sanitized else {
                report.dropped += 1;
                continue;
            };
            if !seen_ids.insert(task.id.clone()) {
                task.id = new_task_id();
                seen_ids.insert(task.id.clone());
                report.reassigned_ids += 1;
            }
            self.tasks.push(task);
        }
        report.loaded = self.tasks.len();

        if report.dropped > 0 || report.reassigned_ids > 0 {
            debug!(
                "event=task_sanitize module=repo dropped={} reassigned_ids={}",
                report.dropped, report.reassigned_ids
            );
        }
        info!(
            "event=task_store_load module=repo status=ok loaded={} dropped={} migrated_keys={}",
            report.loaded, report.dropped, report.migrated_keys
        );

        self.persist();
        report
    }

    /// Validates and appends a new task, then persists.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank after trimming.
    /// - `InvalidDuration` when `duration` is not finite or not `> 0`.
    ///
    /// On error the collection is left untouched.
    pub fn create(
        &mut self,
        name: &str,
        category: &str,
        duration: f64,
        date: NaiveDate,
    ) -> Result<Task, TaskValidationError> {
        let task = match Task::new(name, category, duration, date) {
            Ok(task) => task,
            Err(err) => {
                debug!("event=task_create module=repo status=rejected reason={err}");
                return Err(err);
            }
        };

        self.tasks.push(task.clone());
        debug!(
            "event=task_create module=repo status=ok task_id={} date={}",
            task.id, task.date
        );
        self.persist();
        Ok(task)
    }

    /// Removes the first task with `id`. Returns whether a task was removed.
    ///
    /// Absent ids are a no-op and do not trigger a write.
    pub fn delete_by_id(&mut self, id: &str) -> bool {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            debug!("event=task_delete module=repo status=noop task_id={id}");
            return false;
        };
        self.tasks.remove(index);
        debug!("event=task_delete module=repo status=ok task_id={id}");
        self.persist();
        true
    }

    /// Removes every task on `date`. Returns how many were removed.
    ///
    /// Tasks on other days are untouched; zero matches does not trigger a write.
    pub fn clear_for_date(&mut self, date: NaiveDate) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.date != date);
        let removed = before - self.tasks.len();
        debug!("event=task_clear_day module=repo date={date} removed={removed}");
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Tasks planned on `date`, in insertion order.
    pub fn query_by_date(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.date == date).collect()
    }

    /// Every task in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Current local day according to the store's clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Writes the whole collection. Returns whether the write succeeded.
    fn persist(&self) -> bool {
        let blob = match serde_json::to_string(&self.tasks) {
            Ok(blob) => blob,
            Err(err) => {
                error!(
                    "event=task_persist module=repo status=error error_code=encode_failed error={}",
                    err
                );
                return false;
            }
        };

        match self.storage.set(&self.tasks_key, &blob) {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=task_persist module=repo status=error error_code=storage_write_failed count={} error={}",
                    self.tasks.len(),
                    err
                );
                false
            }
        }
    }

    /// Moves legacy blobs to their current keys, then deletes the legacy key.
    ///
    /// When the target key already holds data the legacy blob is discarded.
    /// A failed copy keeps the legacy key so the next load can retry.
    fn migrate_legacy_keys(&self) -> usize {
        let mut migrated = 0;
        for migration in &self.key_migrations {
            let legacy = match self.storage.get(&migration.from) {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(err) => {
                    warn!(
                        "event=storage_migrate module=repo status=error from={} to={} error={}",
                        migration.from, migration.to, err
                    );
                    continue;
                }
            };

            let target_present = match self.storage.get(&migration.to) {
                Ok(existing) => existing.is_some(),
                Err(err) => {
                    warn!(
                        "event=storage_migrate module=repo status=error from={} to={} error={}",
                        migration.from, migration.to, err
                    );
                    continue;
                }
            };

            if target_present {
                info!(
                    "event=storage_migrate module=repo status=skipped reason=target_present from={} to={}",
                    migration.from, migration.to
                );
            } else if let Err(err) = self.storage.set(&migration.to, &legacy) {
                warn!(
                    "event=storage_migrate module=repo status=error from={} to={} error={}",
                    migration.from, migration.to, err
                );
                continue;
            } else {
                info!(
                    "event=storage_migrate module=repo status=ok from={} to={} bytes={}",
                    migration.from,
                    migration.to,
                    legacy.len()
                );
            }

            if let Err(err) = self.storage.remove(&migration.from) {
                warn!(
                    "event=storage_migrate module=repo status=error step=remove_legacy from={} error={}",
                    migration.from, err
                );
            }
            migrated += 1;
        }
        migrated
    }
}
