//! Create external_link table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExternalLink::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExternalLink::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExternalLink::Name).string_len(128).not_null())
                    .col(ColumnDef::new(ExternalLink::Url).string_len(1024).not_null())
                    .col(ColumnDef::new(ExternalLink::Icon).string_len(1024).null())
                    .col(
                        ColumnDef::new(ExternalLink::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ExternalLink::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ExternalLink::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExternalLink::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ExternalLink {
    Table,
    Id,
    Name,
    Url,
    Icon,
    Order,
    IsVisible,
    CreatedAt,
}
