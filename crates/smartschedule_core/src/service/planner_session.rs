//! Application root for one planner session.
//!
//! # Responsibility
//! - Own the task store and the transient selected date.
//! - Route day-scoped UI requests (add, clear, view) to the selected date.
//!
//! # Invariants
//! - The selected date is never persisted and starts at "today".
//! - Navigation never mutates tasks.

use crate::clock::Clock;
use crate::config::PlannerConfig;
use crate::model::date::{is_storable_day, shift_day};
use crate::model::task::{Task, TaskValidationError};
use crate::repo::task_store::TaskStore;
use crate::service::daily_aggregator::{summarize_day, DailySummary};
use crate::storage::KvStore;
use chrono::NaiveDate;

pub struct PlannerSession<S: KvStore, C: Clock> {
    store: TaskStore<S, C>,
    selected_date: NaiveDate,
    daily_target_hours: f64,
}

impl<S: KvStore, C: Clock> PlannerSession<S, C> {
    /// Loads persisted tasks and selects today.
    pub fn start(storage: S, clock: C, config: &PlannerConfig) -> Self {
        let store = TaskStore::open(storage, clock, config);
        let selected_date = store.today();
        Self {
            store,
            selected_date,
            daily_target_hours: config.daily_target_hours,
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn daily_target_hours(&self) -> f64 {
        self.daily_target_hours
    }

    pub fn next_day(&mut self) -> NaiveDate {
        self.shift_days(1)
    }

    pub fn previous_day(&mut self) -> NaiveDate {
        self.shift_days(-1)
    }

    pub fn shift_days(&mut self, days: i64) -> NaiveDate {
        self.selected_date = shift_day(self.selected_date, days);
        self.selected_date
    }

    /// Selects `date`; a year outside `0000..=9999` keeps the current day.
    pub fn jump_to(&mut self, date: NaiveDate) -> NaiveDate {
        if is_storable_day(date) {
            self.selected_date = date;
        }
        self.selected_date
    }

    pub fn jump_to_today(&mut self) -> NaiveDate {
        self.selected_date = self.store.today();
        self.selected_date
    }

    /// Creates a task on the selected date.
    pub fn add_task(
        &mut self,
        name: &str,
        category: &str,
        duration: f64,
    ) -> Result<Task, TaskValidationError> {
        self.store
            .create(name, category, duration, self.selected_date)
    }

    pub fn remove_task(&mut self, id: &str) -> bool {
        self.store.delete_by_id(id)
    }

    /// Clears the selected date only.
    pub fn clear_selected_day(&mut self) -> usize {
        self.store.clear_for_date(self.selected_date)
    }

    pub fn selected_tasks(&self) -> Vec<&Task> {
        self.store.query_by_date(self.selected_date)
    }

    /// Derived view of the selected date.
    pub fn summary(&self) -> DailySummary {
        summarize_day(
            self.selected_date,
            self.store.query_by_date(self.selected_date),
            self.daily_target_hours,
        )
    }

    pub fn store(&self) -> &TaskStore<S, C> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskStore<S, C> {
        &mut self.store
    }
}
