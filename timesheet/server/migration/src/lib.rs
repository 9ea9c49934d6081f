pub use sea_orm_migration::prelude::*;

mod m20241201_000001_create_projects_table;
mod m20241201_000002_create_tasks_table;
mod m20241201_000003_create_timesheets_table;
mod m20241201_000004_seed_non_project_tasks;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241201_000001_create_projects_table::Migration),
            Box::new(m20241201_000002_create_tasks_table::Migration),
            Box::new(m20241201_000003_create_timesheets_table::Migration),
            Box::new(m20241201_000004_seed_non_project_tasks::Migration),
        ]
    }
}
