//! Create html_module table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HtmlModule::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HtmlModule::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HtmlModule::Title).string_len(256).not_null())
                    .col(
                        ColumnDef::new(HtmlModule::Slug)
                            .string_len(256)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(HtmlModule::Description).text().null())
                    .col(ColumnDef::new(HtmlModule::Content).text().not_null())
                    .col(ColumnDef::new(HtmlModule::CategoryId).string().null())
                    .col(ColumnDef::new(HtmlModule::Tags).json_binary().not_null())
                    .col(
                        ColumnDef::new(HtmlModule::LinkType)
                            .string_len(16)
                            .not_null()
                            .default("modal"),
                    )
                    .col(ColumnDef::new(HtmlModule::ExternalUrl).string_len(1024).null())
                    .col(ColumnDef::new(HtmlModule::CoverImage).string_len(1024).null())
                    .col(
                        ColumnDef::new(HtmlModule::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(HtmlModule::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(HtmlModule::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HtmlModule::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_html_module_category")
                            .from(HtmlModule::Table, HtmlModule::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HtmlModule::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HtmlModule {
    Table,
    Id,
    Title,
    Slug,
    Description,
    Content,
    CategoryId,
    Tags,
    LinkType,
    ExternalUrl,
    CoverImage,
    IsActive,
    OrderIndex,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}
