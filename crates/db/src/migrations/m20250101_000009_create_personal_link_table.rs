//! Create personal_link table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PersonalLink::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PersonalLink::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PersonalLink::Name).string_len(128).not_null())
                    .col(ColumnDef::new(PersonalLink::Icon).string_len(1024).null())
                    .col(ColumnDef::new(PersonalLink::Url).string_len(1024).not_null())
                    .col(ColumnDef::new(PersonalLink::Description).text().null())
                    .col(
                        ColumnDef::new(PersonalLink::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PersonalLink::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PersonalLink::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PersonalLink {
    Table,
    Id,
    Name,
    Icon,
    Url,
    Description,
    OrderIndex,
    CreatedAt,
}
