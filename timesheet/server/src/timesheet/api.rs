use crate::timesheet::grid::{WeekGrid, WeeklyRow};
use crate::timesheet::summary::{WeekSummary, WeekTotal};
use crate::timesheet::validate::SubmittedRow;
use crate::timesheet::week::{parse_date, parse_month};
use crate::timesheet::{TimesheetService, TimesheetState};
use crate::web::api::{ApiError, ErrorResponse};
use axum::{
    Router,
    extract::{Query, State, rejection::JsonRejection},
    response::Json,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Query parameters selecting a week.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekQuery {
    #[serde(default)]
    week_start: Option<String>,
    #[serde(default)]
    week_end: Option<String>,
}

/// Query parameters selecting a month view.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    #[serde(default)]
    month: Option<String>,
}

/// Body of a save request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTimesheetRequest {
    /// First day of the week, YYYY-MM-DD
    #[serde(default)]
    week_start: Option<String>,
    /// Last day of the week, YYYY-MM-DD
    #[serde(default)]
    week_end: Option<String>,
    /// The full grid being submitted
    #[serde(default)]
    rows: Option<Vec<SubmittedRow>>,
}

/// Response of a successful save, carrying the grid as stored.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveTimesheetResponse {
    success: bool,
    rows: Vec<WeeklyRow>,
    #[serde(rename = "nonProjectTasks")]
    non_project_tasks: Vec<String>,
}

impl From<WeekGrid> for SaveTimesheetResponse {
    fn from(grid: WeekGrid) -> Self {
        Self {
            success: true,
            rows: grid.rows,
            non_project_tasks: grid.non_project_tasks,
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn request_date(value: &str) -> Result<NaiveDate, ApiError> {
    parse_date(value).ok_or_else(|| {
        ApiError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", value))
    })
}

fn week_bounds(query: WeekQuery) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let (Some(week_start), Some(week_end)) = (present(query.week_start), present(query.week_end))
    else {
        return Err(ApiError::BadRequest(
            "Missing weekStart or weekEnd parameter.".to_string(),
        ));
    };
    Ok((request_date(&week_start)?, request_date(&week_end)?))
}

/// Handler for GET /api/timesheet-data - Returns the weekly grid.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/timesheet-data",
    params(
        ("weekStart" = String, Query, description = "First day of the week, YYYY-MM-DD"),
        ("weekEnd" = String, Query, description = "Last day of the week, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Successfully built the weekly grid", body = WeekGrid),
        (status = 400, description = "Missing or malformed week bounds", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Timesheet"
)]
pub async fn get_timesheet_data_handler(
    State(state): State<Arc<TimesheetState>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekGrid>, ApiError> {
    let (week_start, week_end) = week_bounds(query)?;
    let service = TimesheetService::new(&state.db);
    let grid = service
        .build_week_grid(state.employee_id, week_start, week_end)
        .await?;
    Ok(Json(grid))
}

/// Handler for POST /api/save-timesheet - Validates and stores a weekly grid.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/save-timesheet",
    request_body = SaveTimesheetRequest,
    responses(
        (status = 200, description = "Grid stored; returns the rebuilt grid", body = SaveTimesheetResponse),
        (status = 400, description = "Missing fields or a booking rule was broken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Timesheet"
)]
pub async fn save_timesheet_handler(
    State(state): State<Arc<TimesheetState>>,
    payload: Result<Json<SaveTimesheetRequest>, JsonRejection>,
) -> Result<Json<SaveTimesheetResponse>, ApiError> {
    let Json(request) = payload?;
    let (Some(week_start), Some(week_end), Some(rows)) = (
        present(request.week_start),
        present(request.week_end),
        request.rows,
    ) else {
        return Err(ApiError::BadRequest(
            "Missing weekStart, weekEnd, or rows.".to_string(),
        ));
    };
    let week_start = request_date(&week_start)?;
    let week_end = request_date(&week_end)?;

    let service = TimesheetService::new(&state.db);
    let grid = service
        .save_week_grid(state.employee_id, week_start, week_end, &rows)
        .await?;
    Ok(Json(SaveTimesheetResponse::from(grid)))
}

/// Handler for GET /api/timesheet-summary - Returns day and task totals for a week.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/timesheet-summary",
    params(
        ("weekStart" = String, Query, description = "First day of the week, YYYY-MM-DD"),
        ("weekEnd" = String, Query, description = "Last day of the week, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Successfully summarized the week", body = WeekSummary),
        (status = 400, description = "Missing or malformed week bounds", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Timesheet"
)]
pub async fn get_timesheet_summary_handler(
    State(state): State<Arc<TimesheetState>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekSummary>, ApiError> {
    let (week_start, week_end) = week_bounds(query)?;
    let service = TimesheetService::new(&state.db);
    let summary = service
        .summarize_week(state.employee_id, week_start, week_end)
        .await?;
    Ok(Json(summary))
}

/// Handler for GET /api/week-totals - Returns stored hours per week of a month view.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/week-totals",
    params(
        ("month" = String, Query, description = "Month of the calendar view, YYYY-MM")
    ),
    responses(
        (status = 200, description = "Successfully totalled the weeks", body = Vec<WeekTotal>),
        (status = 400, description = "Missing or malformed month", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Timesheet"
)]
pub async fn get_week_totals_handler(
    State(state): State<Arc<TimesheetState>>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<WeekTotal>>, ApiError> {
    let Some(month) = present(query.month) else {
        return Err(ApiError::BadRequest("Missing month parameter.".to_string()));
    };
    let month = parse_month(&month).ok_or_else(|| {
        ApiError::BadRequest(format!("Invalid month '{}', expected YYYY-MM", month))
    })?;

    let service = TimesheetService::new(&state.db);
    let totals = service.week_totals(state.employee_id, month).await?;
    Ok(Json(totals))
}

/// Creates and returns the timesheet API router.
pub fn create_api_router(state: Arc<TimesheetState>) -> Router {
    Router::new()
        .route("/timesheet-data", get(get_timesheet_data_handler))
        .route("/save-timesheet", post(save_timesheet_handler))
        .route("/timesheet-summary", get(get_timesheet_summary_handler))
        .route("/week-totals", get(get_week_totals_handler))
        .with_state(state)
}
