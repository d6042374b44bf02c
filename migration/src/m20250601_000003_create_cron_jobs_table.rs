use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CronJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CronJobs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CronJobs::UserId).integer().not_null())
                    .col(ColumnDef::new(CronJobs::Name).string_len(255).not_null())
                    .col(ColumnDef::new(CronJobs::Url).text().not_null())
                    .col(
                        ColumnDef::new(CronJobs::Method)
                            .string_len(10)
                            .not_null()
                            .default("GET"),
                    )
                    .col(ColumnDef::new(CronJobs::Headers).text())
                    .col(ColumnDef::new(CronJobs::Body).text())
                    .col(
                        ColumnDef::new(CronJobs::CronExpression)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CronJobs::TimeoutSeconds)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(ColumnDef::new(CronJobs::NotifyEmail).string_len(255))
                    .col(
                        ColumnDef::new(CronJobs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CronJobs::CurrentStatus)
                            .string_len(20)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(ColumnDef::new(CronJobs::LastExecutionStatus).string_len(20))
                    .col(ColumnDef::new(CronJobs::LastRunAt).timestamp())
                    .col(ColumnDef::new(CronJobs::NextRunAt).timestamp())
                    .col(
                        ColumnDef::new(CronJobs::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CronJobs::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 调度入口按 is_active + next_run_at 扫描到期任务
        manager
            .create_index(
                Index::create()
                    .name("idx_cron_jobs_active_next_run")
                    .table(CronJobs::Table)
                    .col(CronJobs::IsActive)
                    .col(CronJobs::NextRunAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CronJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CronJobs {
    Table,
    Id,
    UserId,
    Name,
    Url,
    Method,
    Headers,
    Body,
    CronExpression,
    TimeoutSeconds,
    NotifyEmail,
    IsActive,
    CurrentStatus,
    LastExecutionStatus,
    LastRunAt,
    NextRunAt,
    CreatedAt,
    UpdatedAt,
}
