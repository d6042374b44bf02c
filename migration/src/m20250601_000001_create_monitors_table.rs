use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Monitors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Monitors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Monitors::UserId).integer().not_null())
                    .col(ColumnDef::new(Monitors::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Monitors::Url).text().not_null())
                    .col(
                        ColumnDef::new(Monitors::Method)
                            .string_len(10)
                            .not_null()
                            .default("GET"),
                    )
                    .col(
                        ColumnDef::new(Monitors::ExpectedStatus)
                            .integer()
                            .not_null()
                            .default(200),
                    )
                    .col(
                        ColumnDef::new(Monitors::TimeoutSeconds)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(Monitors::CheckIntervalSeconds)
                            .integer()
                            .not_null()
                            .default(60),
                    )
                    .col(ColumnDef::new(Monitors::Headers).text())
                    .col(ColumnDef::new(Monitors::Body).text())
                    .col(ColumnDef::new(Monitors::NotifyEmail).string_len(255))
                    .col(
                        ColumnDef::new(Monitors::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Monitors::CurrentStatus)
                            .string_len(20)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(ColumnDef::new(Monitors::LastCheckedAt).timestamp())
                    .col(
                        ColumnDef::new(Monitors::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Monitors::UpdatedAt)
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
                    .name("idx_monitors_is_active")
                    .table(Monitors::Table)
                    .col(Monitors::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_monitors_user_id")
                    .table(Monitors::Table)
                    .col(Monitors::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Monitors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Monitors {
    Table,
    Id,
    UserId,
    Name,
    Url,
    Method,
    ExpectedStatus,
    TimeoutSeconds,
    CheckIntervalSeconds,
    Headers,
    Body,
    NotifyEmail,
    IsActive,
    CurrentStatus,
    LastCheckedAt,
    CreatedAt,
    UpdatedAt,
}
