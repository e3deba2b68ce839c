//! Pure per-day derivations over a task subset.
//!
//! # Responsibility
//! - Compute total hours, progress toward the daily target and the
//!   per-category breakdown.
//! - Format those numbers the way the planner displays them.
//!
//! # Invariants
//! - No mutation, no I/O; output depends only on the arguments.
//! - Category totals sum to the grand total of the same subset.
//! - `progress_ratio` is always within `[0, 1]`.

use crate::model::task::Task;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Display label for tasks without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Summed hours of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub label: String,
    pub hours: f64,
}

/// Everything the day view renders for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub total_hours: f64,
    pub target_hours: f64,
    /// `total_hours / target_hours` clamped to `[0, 1]`.
    pub progress_ratio: f64,
    /// Progress in percent, rounded to one decimal.
    pub progress_percent: f64,
    /// First-seen category order.
    pub categories: Vec<CategoryTotal>,
}

/// Sum of durations; `0` for an empty subset.
pub fn total_hours<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> f64 {
    tasks.into_iter().map(|task| task.duration).sum()
}

/// Label shown for `category`, substituting [`UNCATEGORIZED_LABEL`] for empty.
pub fn category_label(category: &str) -> &str {
    if category.is_empty() {
        UNCATEGORIZED_LABEL
    } else {
        category
    }
}

/// Groups hours by display label, preserving first-seen order.
pub fn category_breakdown<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_label: HashMap<&str, usize> = HashMap::new();

    for task in tasks {
        let label = category_label(&task.category);
        match index_by_label.get(label) {
            Some(&index) => totals[index].hours += task.duration,
            None => {
                index_by_label.insert(label, totals.len());
                totals.push(CategoryTotal {
                    label: label.to_string(),
                    hours: task.duration,
                });
            }
        }
    }

    totals
}

/// `clamp(total / target, 0, 1)`, or `0` when `target` is not a positive number.
pub fn progress_ratio(total_hours: f64, target_hours: f64) -> f64 {
    if target_hours.is_nan() || target_hours <= 0.0 {
        return 0.0;
    }
    let ratio = total_hours / target_hours;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

/// Converts a ratio to a percentage rounded to one decimal place.
pub fn progress_percent(ratio: f64) -> f64 {
    (ratio * 1000.0).round() / 10.0
}

/// Hours with two decimals, dropping an all-zero fraction (`3` → `"3"`).
pub fn format_hours(hours: f64) -> String {
    let fixed = format!("{hours:.2}");
    match fixed.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => fixed,
    }
}

/// Sentence describing how much of the day is planned.
pub fn progress_label(percent: f64) -> String {
    format!("You've planned {percent:.1}% of your day")
}

/// Builds the complete derived view for `date` from its task subset.
pub fn summarize_day<'a>(
    date: NaiveDate,
    tasks: impl IntoIterator<Item = &'a Task>,
    target_hours: f64,
) -> DailySummary {
    let tasks: Vec<Task> = tasks.into_iter().cloned().collect();
    let total = total_hours(&tasks);
    let ratio = progress_ratio(total, target_hours);

    DailySummary {
        date,
        categories: category_breakdown(&tasks),
        total_hours: total,
        target_hours,
        progress_ratio: ratio,
        progress_percent: progress_percent(ratio),
        tasks,
    }
}
