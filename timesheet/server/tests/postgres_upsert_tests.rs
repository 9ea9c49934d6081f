use sea_orm::EntityTrait;
use serde_json::json;
use timesheet_server::entities::timesheet;
use timesheet_server::timesheet::TimesheetService;
use timesheet_server::timesheet::validate::SubmittedRow;

mod common;

use common::{EMPLOYEE_ID, create_design_task, create_entry, date};

#[tokio::test]
#[ignore = "starts a Postgres container and needs Docker"]
async fn can_upsert_entries_on_postgres() {
    let _ = tracing_subscriber::fmt().try_init();
    let container = common::setup_container()
        .await
        .expect("Failed to start Postgres container");
    let db = common::setup_postgres_db(&container)
        .await
        .expect("Failed to setup Postgres database");
    create_design_task(&db).await;
    create_entry(&db, 1, "2024-12-01", 2.0, "Pending").await;
    let service = TimesheetService::new(&db);

    let rows: Vec<SubmittedRow> = serde_json::from_value(json!([
        { "task_id": 1, "hours": ["6", "3", "", "", "", "", ""] },
        { "task_id": 9999, "hours": ["", "", "1", "", "", "", ""] }
    ]))
    .unwrap();
    let saved = service
        .save_week_grid(EMPLOYEE_ID, date("2024-12-01"), date("2024-12-07"), &rows)
        .await
        .expect("Failed to save grid");

    assert_eq!(saved.rows[0].hours, ["6", "3", "", "", "", "", ""]);
    let entries = timesheet::Entity::find().all(&db).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|entry| entry.status == "Approved"));
}
