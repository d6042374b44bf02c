use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonitorChecks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonitorChecks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonitorChecks::MonitorId).integer().not_null())
                    .col(ColumnDef::new(MonitorChecks::Status).string_len(20).not_null())
                    .col(ColumnDef::new(MonitorChecks::ResponseTimeMs).integer())
                    .col(ColumnDef::new(MonitorChecks::StatusCode).integer())
                    .col(ColumnDef::new(MonitorChecks::ErrorMessage).text())
                    .col(
                        ColumnDef::new(MonitorChecks::CheckedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monitor_checks_monitor_id")
                            .from(MonitorChecks::Table, MonitorChecks::MonitorId)
                            .to(Monitors::Table, Monitors::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 状态页按时间倒序读取最近的检查记录
        manager
            .create_index(
                Index::create()
                    .name("idx_monitor_checks_monitor_checked_at")
                    .table(MonitorChecks::Table)
                    .col(MonitorChecks::MonitorId)
                    .col(MonitorChecks::CheckedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonitorChecks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MonitorChecks {
    Table,
    Id,
    MonitorId,
    Status,
    ResponseTimeMs,
    StatusCode,
    ErrorMessage,
    CheckedAt,
}

#[derive(DeriveIden)]
enum Monitors {
    Table,
    Id,
}
