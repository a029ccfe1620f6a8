//! Create project table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Project::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Project::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Project::Description).text().null())
                    .col(ColumnDef::new(Project::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Project::Icon).string_len(1024).null())
                    .col(ColumnDef::new(Project::FileUrl).string_len(1024).null())
                    .col(ColumnDef::new(Project::QrCodeUrl).string_len(1024).null())
                    .col(ColumnDef::new(Project::WebUrl).string_len(1024).null())
                    .col(ColumnDef::new(Project::Tags).json_binary().not_null())
                    .col(
                        ColumnDef::new(Project::Downloads)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Project::Views).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Project::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Project::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Project::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Project::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_published_order")
                    .table(Project::Table)
                    .col(Project::IsPublished)
                    .col(Project::OrderIndex)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Project {
    Table,
    Id,
    Title,
    Description,
    Category,
    Icon,
    FileUrl,
    QrCodeUrl,
    WebUrl,
    Tags,
    Downloads,
    Views,
    IsPublished,
    OrderIndex,
    CreatedAt,
    UpdatedAt,
}
