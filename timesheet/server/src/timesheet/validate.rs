//! Checks a submitted grid and turns it into the set of cells to persist.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use utoipa::ToSchema;

use super::AssignedTask;
use super::grid::EntryLookup;
use super::registry;
use super::week::week_days;

/// Most hours that may be logged against one task on one day.
pub const DAILY_HOURS_CAP: f64 = 9.0;

/// A row of the grid as submitted by the client.
///
/// Only the task identifier and the hours are read; the other columns the
/// client echoes back are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SubmittedRow {
    /// Task identifier; rows without one are skipped
    #[serde(default)]
    pub task_id: Option<i32>,
    /// Hours per day, Sunday first
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub hours: Vec<Value>,
}

/// A cell accepted for persistence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellWrite {
    pub task_id: i32,
    pub date: NaiveDate,
    pub hours: f64,
}

/// A business rule broken by a submitted grid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CellViolation {
    #[error("Cannot log more than 9 hours in a single day for task_id: {task_id} on {date}")]
    DailyCapExceeded {
        task_id: i32,
        date: NaiveDate,
        hours: f64,
    },
    #[error("Cannot log negative hours ({hours}) for task_id: {task_id} on {date}")]
    NegativeHours {
        task_id: i32,
        date: NaiveDate,
        hours: f64,
    },
    #[error(
        "Cannot log hours for task_id: {task_id} on {date}, outside the project dates {start} to {end}"
    )]
    OutsideProjectDates {
        task_id: i32,
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("Total hours ({total}) exceed allocated hours ({allocated} hrs) for task_id: {task_id}")]
    AllocationExceeded {
        task_id: i32,
        total: f64,
        allocated: f64,
    },
    #[error("Unknown task_id: {task_id}")]
    UnknownTask { task_id: i32 },
}

/// Reads a cell as hours. Anything that is not a number counts as no entry.
/// Infinities are kept so the cap and sign checks reject them.
pub fn parse_hours(value: &Value) -> Option<f64> {
    let hours = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (!hours.is_nan()).then_some(hours)
}

/// Validates every cell of `rows` for the week starting at `week_start`.
///
/// `tasks` holds the employee's assigned tasks by id and `stored` the
/// entries already persisted for the week. Either every violation found is
/// returned, or the full write-set ordered by task and date. When a task
/// appears in several rows, the last value for a day wins.
pub fn plan_writes(
    week_start: NaiveDate,
    rows: &[SubmittedRow],
    tasks: &HashMap<i32, AssignedTask>,
    stored: &EntryLookup,
) -> Result<Vec<CellWrite>, Vec<CellViolation>> {
    let days = week_days(week_start);
    let mut planned: BTreeMap<(i32, NaiveDate), f64> = BTreeMap::new();
    let mut ceilings: Vec<(i32, f64)> = Vec::new();
    let mut violations = Vec::new();

    for row in rows {
        let Some(task_id) = row.task_id else {
            tracing::warn!("Skipping submitted row without a task_id");
            continue;
        };

        let task = tasks.get(&task_id);
        if task.is_none() && !registry::is_non_project_task(task_id) {
            violations.push(CellViolation::UnknownTask { task_id });
            continue;
        }
        let window = task.and_then(|task| task.project.as_ref());

        for (offset, date) in days.iter().copied().enumerate() {
            let Some(hours) = row.hours.get(offset).and_then(parse_hours) else {
                continue;
            };
            if hours > DAILY_HOURS_CAP {
                violations.push(CellViolation::DailyCapExceeded {
                    task_id,
                    date,
                    hours,
                });
                continue;
            }
            if hours < 0.0 {
                violations.push(CellViolation::NegativeHours {
                    task_id,
                    date,
                    hours,
                });
                continue;
            }
            if let Some(window) = window.filter(|window| !window.contains(date)) {
                violations.push(CellViolation::OutsideProjectDates {
                    task_id,
                    date,
                    start: window.start_date,
                    end: window.end_date,
                });
                continue;
            }
            planned.insert((task_id, date), hours);
        }

        if let Some(allocated) = task.and_then(AssignedTask::allocated_hours) {
            if !ceilings.iter().any(|(id, _)| *id == task_id) {
                ceilings.push((task_id, allocated));
            }
        }
    }

    // The ceiling holds over what the week looks like after the write:
    // submitted values where given, stored values otherwise.
    for (task_id, allocated) in ceilings {
        let total: f64 = days
            .iter()
            .map(|date| {
                planned
                    .get(&(task_id, *date))
                    .or_else(|| stored.get(&(task_id, *date)))
                    .copied()
                    .unwrap_or(0.0)
            })
            .sum();
        if total > allocated {
            violations.push(CellViolation::AllocationExceeded {
                task_id,
                total,
                allocated,
            });
        }
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(planned
        .into_iter()
        .map(|((task_id, date), hours)| CellWrite {
            task_id,
            date,
            hours,
        })
        .collect())
}
