use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Incidents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incidents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incidents::TargetKind).string_len(20).not_null())
                    .col(ColumnDef::new(Incidents::TargetId).integer().not_null())
                    .col(
                        ColumnDef::new(Incidents::Status)
                            .string_len(20)
                            .not_null()
                            .default("ongoing"),
                    )
                    .col(ColumnDef::new(Incidents::Cause).string_len(30).not_null())
                    .col(ColumnDef::new(Incidents::StartedAt).timestamp().not_null())
                    .col(ColumnDef::new(Incidents::ResolvedAt).timestamp())
                    .col(
                        ColumnDef::new(Incidents::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incidents_target")
                    .table(Incidents::Table)
                    .col(Incidents::TargetKind)
                    .col(Incidents::TargetId)
                    .col(Incidents::StartedAt)
                    .to_owned(),
            )
            .await?;

        // 同一目标最多一条进行中的故障事件（SQLite 与 PostgreSQL 都支持部分索引）
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uniq_incidents_ongoing_target \
                 ON incidents (target_kind, target_id) WHERE status = 'ongoing'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Incidents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Incidents {
    Table,
    Id,
    TargetKind,
    TargetId,
    Status,
    Cause,
    StartedAt,
    ResolvedAt,
    CreatedAt,
}
