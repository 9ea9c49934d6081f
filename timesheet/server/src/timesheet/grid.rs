//! Dense weekly grid assembled from sparse per-day entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use super::AssignedTask;
use super::registry::{self, NON_PROJECT};
use super::week::{DAYS_IN_WEEK, week_days};

/// Logged hours keyed by (task id, date).
pub type EntryLookup = HashMap<(i32, NaiveDate), f64>;

/// One task's hours for the requested week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeeklyRow {
    /// Owning project name, or "Non-Project"
    pub project: String,
    /// Task name
    pub task: String,
    /// Task identifier
    pub task_id: i32,
    /// Hour ceiling for the week; only set for project tasks
    #[serde(rename = "allocatedHours")]
    pub allocated_hours: Option<f64>,
    /// First day hours may be logged against the project
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    /// Last day hours may be logged against the project
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
    /// Hours per day, Sunday first; an empty string means no entry
    #[schema(value_type = Vec<String>)]
    pub hours: [String; DAYS_IN_WEEK],
    /// Whether the task identity may be changed by the client
    #[serde(rename = "isEditable")]
    pub is_editable: bool,
}

/// The grid returned for a week, with the non-project task names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeekGrid {
    pub rows: Vec<WeeklyRow>,
    #[serde(rename = "nonProjectTasks")]
    pub non_project_tasks: Vec<String>,
}

/// Formats stored hours the way the client edits them ("5", "7.5").
pub fn format_hours(hours: f64) -> String {
    hours.to_string()
}

fn hours_for(
    task_id: i32,
    days: &[NaiveDate; DAYS_IN_WEEK],
    entries: &EntryLookup,
) -> [String; DAYS_IN_WEEK] {
    std::array::from_fn(|offset| {
        entries
            .get(&(task_id, days[offset]))
            .map(|hours| format_hours(*hours))
            .unwrap_or_default()
    })
}

/// Builds the week grid for `tasks`, then appends a row for every
/// non-project task the employee is not already assigned.
pub fn assemble_week_grid(
    week_start: NaiveDate,
    tasks: &[AssignedTask],
    entries: &EntryLookup,
) -> WeekGrid {
    let days = week_days(week_start);

    let mut rows: Vec<WeeklyRow> = tasks
        .iter()
        .map(|task| WeeklyRow {
            project: task
                .project
                .as_ref()
                .map_or_else(|| NON_PROJECT.to_string(), |project| project.name.clone()),
            task: task.task_name.clone(),
            task_id: task.task_id,
            allocated_hours: task.allocated_hours(),
            start_date: task.project.as_ref().map(|project| project.start_date),
            end_date: task.project.as_ref().map(|project| project.end_date),
            hours: hours_for(task.task_id, &days, entries),
            is_editable: task.is_editable(),
        })
        .collect();

    for non_project in registry::NON_PROJECT_TASKS {
        if rows.iter().any(|row| row.task_id == non_project.task_id) {
            continue;
        }
        rows.push(WeeklyRow {
            project: NON_PROJECT.to_string(),
            task: non_project.name.to_string(),
            task_id: non_project.task_id,
            allocated_hours: None,
            start_date: None,
            end_date: None,
            hours: hours_for(non_project.task_id, &days, entries),
            is_editable: true,
        });
    }

    WeekGrid {
        rows,
        non_project_tasks: registry::non_project_task_names(),
    }
}
