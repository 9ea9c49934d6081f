use axum::Router;
use axum::routing::get;
use migration::MigratorTrait;
use sea_orm::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{self, Config};
use crate::timesheet::TimesheetState;

pub mod api;

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let app = create_app(&config, db);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Assembles the full application router on top of a migrated database.
pub fn create_app(config: &Config, db: sea_orm::DatabaseConnection) -> Router {
    let timesheet_state = Arc::new(TimesheetState {
        db: Arc::new(db),
        employee_id: config.employee_id,
    });

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(api::create_api_router(timesheet_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
