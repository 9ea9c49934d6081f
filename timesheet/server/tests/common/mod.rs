#![allow(dead_code)]

use chrono::NaiveDate;
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ActiveValue, ConnectOptions, Database, DatabaseConnection};
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};
use timesheet_server::entities::{project, task, timesheet};

pub const EMPLOYEE_ID: i32 = 2;

/// Opens a fresh in-memory SQLite database with all migrations applied.
pub async fn setup_sqlite_db() -> anyhow::Result<DatabaseConnection> {
    // A single pooled connection, so every query sees the same in-memory database.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

pub async fn setup_postgres_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
    let db = Database::connect(&db_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

/// Test helper to create a project and return its ID.
pub async fn create_project(db: &DatabaseConnection, name: &str, start: &str, end: &str) -> i32 {
    let project = project::ActiveModel {
        project_name: ActiveValue::Set(name.to_string()),
        start_date: ActiveValue::Set(date(start)),
        end_date: ActiveValue::Set(date(end)),
        ..Default::default()
    };
    project.insert(db).await.unwrap().project_id
}

/// Test helper to create a task assigned to the test employee.
pub async fn create_task(
    db: &DatabaseConnection,
    task_id: i32,
    name: &str,
    project_id: Option<i32>,
    estimated_hours: Option<f64>,
) {
    let task = task::ActiveModel {
        task_id: ActiveValue::Set(task_id),
        task_name: ActiveValue::Set(name.to_string()),
        project_id: ActiveValue::Set(project_id),
        estimated_hours: ActiveValue::Set(estimated_hours),
        assigned_to: ActiveValue::Set(Some(EMPLOYEE_ID)),
    };
    task.insert(db).await.unwrap();
}

/// Test helper to store an entry for the test employee.
pub async fn create_entry(db: &DatabaseConnection, task_id: i32, on: &str, hours: f64, status: &str) {
    let entry = timesheet::ActiveModel {
        task_id: ActiveValue::Set(task_id),
        employee_id: ActiveValue::Set(EMPLOYEE_ID),
        date: ActiveValue::Set(date(on)),
        hours_logged: ActiveValue::Set(hours),
        status: ActiveValue::Set(status.to_string()),
        ..Default::default()
    };
    entry.insert(db).await.unwrap();
}

/// Creates project "Apollo" running through December 2024 with task 1
/// ("Design", 40 allocated hours).
pub async fn create_design_task(db: &DatabaseConnection) {
    let project_id = create_project(db, "Apollo", "2024-11-01", "2024-12-31").await;
    create_task(db, 1, "Design", Some(project_id), Some(40.0)).await;
}
