use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use crate::m20241201_000002_create_tasks_table::Tasks;

#[derive(DeriveMigrationName)]
pub struct Migration;

const NON_PROJECT_TASKS: [(i32, &str); 2] = [(9999, "Training"), (9998, "Meeting")];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Tasks::Table)
            .columns([Tasks::TaskId, Tasks::TaskName]);
        for (task_id, task_name) in NON_PROJECT_TASKS {
            insert.values_panic([task_id.into(), task_name.into()]);
        }

        let db = manager.get_connection();
        db.execute(db.get_database_backend().build(&insert)).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Tasks::Table)
            .and_where(Expr::col(Tasks::TaskId).is_in(NON_PROJECT_TASKS.map(|(id, _)| id)))
            .to_owned();

        let db = manager.get_connection();
        db.execute(db.get_database_backend().build(&delete)).await?;
        Ok(())
    }
}
