use crate::entities::*;
use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::collections::HashMap;
use std::sync::Arc;

pub mod api;
pub mod grid;
pub mod registry;
pub mod summary;
pub mod validate;
pub mod week;

use grid::{EntryLookup, WeekGrid};
use summary::{WeekSummary, WeekTotal};
use validate::{CellViolation, CellWrite, SubmittedRow};
use week::{DAYS_IN_WEEK, week_days};

/// Status every upserted entry is given.
pub const APPROVED_STATUS: &str = "Approved";

/// Date range of the project owning a task.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectWindow {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ProjectWindow {
    /// Returns whether hours may be logged on `date`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A task assigned to an employee, with its owning project if any.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedTask {
    pub task_id: i32,
    pub task_name: String,
    pub estimated_hours: Option<f64>,
    pub project: Option<ProjectWindow>,
}

impl AssignedTask {
    /// Weekly hour ceiling. Tasks without a project have none.
    pub fn allocated_hours(&self) -> Option<f64> {
        self.project.as_ref().and(self.estimated_hours)
    }

    pub fn is_editable(&self) -> bool {
        self.project.is_none()
    }
}

impl From<(task::Model, Option<project::Model>)> for AssignedTask {
    fn from((task, project): (task::Model, Option<project::Model>)) -> Self {
        AssignedTask {
            task_id: task.task_id,
            task_name: task.task_name,
            estimated_hours: task.estimated_hours,
            project: project.map(|project| ProjectWindow {
                name: project.project_name,
                start_date: project.start_date,
                end_date: project.end_date,
            }),
        }
    }
}

/// Error type for TimesheetService operations.
#[derive(Debug, thiserror::Error)]
pub enum TimesheetError {
    /// The submitted grid broke one or more booking rules; nothing was written.
    #[error("{}", describe_violations(.0))]
    Rejected(Vec<CellViolation>),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

fn describe_violations(violations: &[CellViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Clone, Debug)]
pub struct TimesheetState {
    pub db: Arc<sea_orm::DatabaseConnection>,
    /// Identity every request books hours for.
    pub employee_id: i32,
}

pub struct TimesheetService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TimesheetService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TimesheetService<'_> {
        TimesheetService { db }
    }

    /// Builds the dense weekly grid for an employee.
    ///
    /// # Arguments
    ///
    /// * `employee_id` - The employee whose tasks and hours are read.
    /// * `week_start` - Date of the first grid column.
    /// * `week_end` - Last date entries are read for, inclusive.
    ///
    /// # Returns
    ///
    /// A `Result` containing one row per assigned task plus the non-project
    /// tasks, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn build_week_grid(
        &self,
        employee_id: i32,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> Result<WeekGrid, TimesheetError> {
        let tasks = fetch_assigned_tasks(self.db, employee_id).await?;
        let entries = fetch_entries(self.db, employee_id, week_start, week_end).await?;
        Ok(grid::assemble_week_grid(week_start, &tasks, &entries))
    }

    /// Validates a submitted grid, persists it and returns the rebuilt grid.
    ///
    /// Every cell is checked before anything is written. All accepted cells
    /// are then upserted in one transaction with the status forced to
    /// "Approved"; a rejected grid leaves the store untouched.
    ///
    /// # Arguments
    ///
    /// * `employee_id` - The employee the hours are booked for.
    /// * `week_start` - Date of the first grid column.
    /// * `week_end` - Last date of the rebuilt grid, inclusive.
    /// * `rows` - The grid as submitted by the client.
    ///
    /// # Returns
    ///
    /// A `Result` containing the grid as stored after the write, or an error otherwise.
    #[tracing::instrument(skip(self, rows))]
    pub async fn save_week_grid(
        &self,
        employee_id: i32,
        week_start: NaiveDate,
        week_end: NaiveDate,
        rows: &[SubmittedRow],
    ) -> Result<WeekGrid, TimesheetError> {
        let grid_end = week_days(week_start)[DAYS_IN_WEEK - 1];

        let txn = self.db.begin().await?;
        let tasks: HashMap<i32, AssignedTask> = fetch_assigned_tasks(&txn, employee_id)
            .await?
            .into_iter()
            .map(|task| (task.task_id, task))
            .collect();
        let stored = fetch_entries(&txn, employee_id, week_start, grid_end).await?;

        let writes = match validate::plan_writes(week_start, rows, &tasks, &stored) {
            Ok(writes) => writes,
            Err(violations) => {
                txn.rollback().await?;
                tracing::info!("Rejected timesheet with {} violation(s)", violations.len());
                return Err(TimesheetError::Rejected(violations));
            }
        };

        upsert_entries(&txn, employee_id, &writes).await?;
        txn.commit().await?;

        self.build_week_grid(employee_id, week_start, week_end).await
    }

    /// Summarizes the weekly grid of an employee into per-day and per-task totals.
    #[tracing::instrument(skip(self))]
    pub async fn summarize_week(
        &self,
        employee_id: i32,
        week_start: NaiveDate,
        week_end: NaiveDate,
    ) -> Result<WeekSummary, TimesheetError> {
        let grid = self
            .build_week_grid(employee_id, week_start, week_end)
            .await?;
        Ok(summary::summarize(week_start, &grid.rows))
    }

    /// Totals stored hours for every week of the month view containing `month`.
    #[tracing::instrument(skip(self))]
    pub async fn week_totals(
        &self,
        employee_id: i32,
        month: NaiveDate,
    ) -> Result<Vec<WeekTotal>, TimesheetError> {
        let weeks = week::weeks_in_month(month);
        let (Some(first), Some(last)) = (weeks.first(), weeks.last()) else {
            return Ok(Vec::new());
        };
        let entries = fetch_entries(self.db, employee_id, first.start(), last.end()).await?;
        Ok(summary::week_totals(&weeks, &entries))
    }
}

async fn fetch_assigned_tasks<C: ConnectionTrait>(
    conn: &C,
    employee_id: i32,
) -> Result<Vec<AssignedTask>, DbErr> {
    let tasks = task::Entity::find()
        .filter(task::Column::AssignedTo.eq(employee_id))
        .find_also_related(project::Entity)
        .order_by_asc(task::Column::TaskId)
        .all(conn)
        .await?
        .into_iter()
        .map(AssignedTask::from)
        .collect();
    Ok(tasks)
}

async fn fetch_entries<C: ConnectionTrait>(
    conn: &C,
    employee_id: i32,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<EntryLookup, DbErr> {
    let entries = timesheet::Entity::find()
        .filter(timesheet::Column::EmployeeId.eq(employee_id))
        .filter(timesheet::Column::Date.between(from, to))
        .all(conn)
        .await?
        .into_iter()
        .map(|entry| ((entry.task_id, entry.date), entry.hours_logged))
        .collect();
    Ok(entries)
}

async fn upsert_entries<C: ConnectionTrait>(
    conn: &C,
    employee_id: i32,
    writes: &[CellWrite],
) -> Result<(), DbErr> {
    if writes.is_empty() {
        return Ok(());
    }

    let mut models = Vec::with_capacity(writes.len());
    for write in writes {
        tracing::info!(
            "Saving timesheet for task_id={}, date={}, hours={}",
            write.task_id,
            write.date,
            write.hours
        );
        models.push(timesheet::ActiveModel {
            task_id: ActiveValue::Set(write.task_id),
            employee_id: ActiveValue::Set(employee_id),
            date: ActiveValue::Set(write.date),
            hours_logged: ActiveValue::Set(write.hours),
            status: ActiveValue::Set(APPROVED_STATUS.to_string()),
            ..Default::default()
        });
    }

    timesheet::Entity::insert_many(models)
        .on_conflict(
            OnConflict::columns([
                timesheet::Column::TaskId,
                timesheet::Column::EmployeeId,
                timesheet::Column::Date,
            ])
            .update_columns([timesheet::Column::HoursLogged, timesheet::Column::Status])
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use week::parse_date;

    #[test]
    fn can_join_violations_into_one_message() {
        let date = parse_date("2024-12-03").unwrap();
        let error = TimesheetError::Rejected(vec![
            CellViolation::DailyCapExceeded {
                task_id: 1,
                date,
                hours: 10.0,
            },
            CellViolation::UnknownTask { task_id: 42 },
        ]);

        assert_eq!(
            error.to_string(),
            "Cannot log more than 9 hours in a single day for task_id: 1 on 2024-12-03; Unknown task_id: 42"
        );
    }

    #[test]
    fn can_keep_allocation_and_lock_identity_of_project_tasks() {
        let task = AssignedTask::from((
            task::Model {
                task_id: 1,
                task_name: "Design".to_string(),
                project_id: Some(7),
                estimated_hours: Some(40.0),
                assigned_to: Some(2),
            },
            Some(project::Model {
                project_id: 7,
                project_name: "Apollo".to_string(),
                start_date: parse_date("2024-11-01").unwrap(),
                end_date: parse_date("2024-12-31").unwrap(),
            }),
        ));

        assert_eq!(task.allocated_hours(), Some(40.0));
        assert!(!task.is_editable());
        assert!(task.project.as_ref().unwrap().contains(parse_date("2024-12-31").unwrap()));
        assert!(!task.project.as_ref().unwrap().contains(parse_date("2025-01-01").unwrap()));
    }
}
