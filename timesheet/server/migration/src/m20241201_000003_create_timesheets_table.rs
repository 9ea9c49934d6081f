use sea_orm_migration::prelude::*;

use crate::m20241201_000002_create_tasks_table::Tasks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Timesheets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Timesheets::TimesheetId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Timesheets::TaskId).integer().not_null())
                    .col(ColumnDef::new(Timesheets::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(Timesheets::Date).date().not_null())
                    .col(ColumnDef::new(Timesheets::HoursLogged).double().not_null())
                    .col(
                        ColumnDef::new(Timesheets::Status)
                            .string()
                            .not_null()
                            .default("Pending"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timesheets_task_id")
                            .from(Timesheets::Table, Timesheets::TaskId)
                            .to(Tasks::Table, Tasks::TaskId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key of an entry; the upsert conflicts on it.
        manager
            .create_index(
                Index::create()
                    .name("timesheets_task_employee_date_unique")
                    .table(Timesheets::Table)
                    .col(Timesheets::TaskId)
                    .col(Timesheets::EmployeeId)
                    .col(Timesheets::Date)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Timesheets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Timesheets {
    Table,
    TimesheetId,
    TaskId,
    EmployeeId,
    Date,
    HoursLogged,
    Status,
}
