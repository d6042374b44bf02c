use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CronExecutions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CronExecutions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CronExecutions::JobId).integer().not_null())
                    .col(
                        ColumnDef::new(CronExecutions::Status)
                            .string_len(20)
                            .not_null()
                            .default("running"),
                    )
                    .col(
                        ColumnDef::new(CronExecutions::StartedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(CronExecutions::CompletedAt).timestamp())
                    .col(ColumnDef::new(CronExecutions::DurationMs).integer())
                    .col(ColumnDef::new(CronExecutions::ResponseStatus).integer())
                    .col(ColumnDef::new(CronExecutions::ResponseBody).text())
                    .col(ColumnDef::new(CronExecutions::ErrorMessage).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cron_executions_job_id")
                            .from(CronExecutions::Table, CronExecutions::JobId)
                            .to(CronJobs::Table, CronJobs::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cron_executions_job_started_at")
                    .table(CronExecutions::Table)
                    .col(CronExecutions::JobId)
                    .col(CronExecutions::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CronExecutions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CronExecutions {
    Table,
    Id,
    JobId,
    Status,
    StartedAt,
    CompletedAt,
    DurationMs,
    ResponseStatus,
    ResponseBody,
    ErrorMessage,
}

#[derive(DeriveIden)]
enum CronJobs {
    Table,
    Id,
}
