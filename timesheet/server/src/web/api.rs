use std::sync::Arc;

use axum::{
    Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::timesheet::{TimesheetError, TimesheetState};

/// JSON body of every failed API request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Message shown to the user
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

/// Custom error type for API handler operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request is missing a field or carries a malformed one.
    #[error("{0}")]
    BadRequest(String),
    /// Represents a failure of the timesheet service.
    #[error(transparent)]
    Timesheet(#[from] TimesheetError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Timesheet(err @ TimesheetError::Rejected(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Timesheet(TimesheetError::Database(err)) => {
                tracing::error!("Timesheet storage failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        (status_code, Json(ErrorResponse::new(message))).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::timesheet::api::get_timesheet_data_handler,
        crate::timesheet::api::save_timesheet_handler,
        crate::timesheet::api::get_timesheet_summary_handler,
        crate::timesheet::api::get_week_totals_handler
    ),
    tags((name = "Timesheet", description = "Weekly timesheet booking"))
)]
pub struct ApiDoc;

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(timesheet_state: Arc<TimesheetState>) -> Router {
    Router::new().nest(
        "/api",
        crate::timesheet::api::create_api_router(timesheet_state),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timesheet::validate::CellViolation;
    use chrono::NaiveDate;

    async fn error_body(response: Response) -> ErrorResponse {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn can_render_bad_request_as_json_error() {
        let response =
            ApiError::BadRequest("Missing weekStart or weekEnd parameter.".to_string())
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_body(response).await.error,
            "Missing weekStart or weekEnd parameter."
        );
    }

    #[tokio::test]
    async fn can_render_rejected_grid_as_bad_request() {
        let error = TimesheetError::Rejected(vec![CellViolation::DailyCapExceeded {
            task_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 12, 3).unwrap(),
            hours: 10.0,
        }]);

        let response = ApiError::from(error).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_body(response).await.error,
            "Cannot log more than 9 hours in a single day for task_id: 1 on 2024-12-03"
        );
    }

    #[tokio::test]
    async fn can_hide_storage_failures_behind_generic_message() {
        let error = TimesheetError::Database(sea_orm::DbErr::Custom("connection reset".to_string()));

        let response = ApiError::from(error).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_body(response).await.error, "Internal server error.");
    }
}
