use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::grid::{EntryLookup, WeeklyRow};
use super::registry::NON_PROJECT;
use super::week::{Week, week_days};

/// Hours booked on one day, split by whether a project owns the task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub billable: f64,
    pub non_billable: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowSummary {
    #[serde(rename = "task_id")]
    pub task_id: i32,
    pub task: String,
    pub total_hours: f64,
    pub allocated_hours: Option<f64>,
    pub exceeds_allocated: bool,
}

/// Totals of a week grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub days: Vec<DaySummary>,
    pub rows: Vec<RowSummary>,
    pub total_hours: f64,
}

/// Hours stored for one week of a month view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekTotal {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_hours: f64,
}

fn cell_hours(cell: &str) -> f64 {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|hours| hours.is_finite())
        .unwrap_or(0.0)
}

pub fn summarize(week_start: NaiveDate, rows: &[WeeklyRow]) -> WeekSummary {
    let mut days: Vec<DaySummary> = week_days(week_start)
        .into_iter()
        .map(|date| DaySummary {
            date,
            billable: 0.0,
            non_billable: 0.0,
        })
        .collect();

    let mut row_summaries = Vec::with_capacity(rows.len());
    for row in rows {
        let billable = row.project != NON_PROJECT;
        let mut total_hours = 0.0;
        for (day, cell) in days.iter_mut().zip(&row.hours) {
            let hours = cell_hours(cell);
            if billable {
                day.billable += hours;
            } else {
                day.non_billable += hours;
            }
            total_hours += hours;
        }
        row_summaries.push(RowSummary {
            task_id: row.task_id,
            task: row.task.clone(),
            total_hours,
            allocated_hours: row.allocated_hours,
            exceeds_allocated: row
                .allocated_hours
                .is_some_and(|allocated| total_hours > allocated),
        });
    }

    let total_hours = row_summaries.iter().map(|row| row.total_hours).sum();
    WeekSummary {
        days,
        rows: row_summaries,
        total_hours,
    }
}

/// Sums stored entries into each of `weeks`.
pub fn week_totals(weeks: &[Week], entries: &EntryLookup) -> Vec<WeekTotal> {
    weeks
        .iter()
        .map(|week| WeekTotal {
            week_start: week.start(),
            week_end: week.end(),
            total_hours: entries
                .iter()
                .filter(|((_, date), _)| week.contains(*date))
                .map(|(_, hours)| hours)
                .sum(),
        })
        .collect()
}
