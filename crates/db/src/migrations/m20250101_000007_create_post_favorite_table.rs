//! Create post_favorite table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostFavorite::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostFavorite::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(PostFavorite::PostSlug).string_len(256).not_null())
                    .col(ColumnDef::new(PostFavorite::UserId).string().not_null())
                    .col(
                        ColumnDef::new(PostFavorite::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_favorite_post")
                            .from(PostFavorite::Table, PostFavorite::PostSlug)
                            .to(Post::Table, Post::Slug)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_favorite_user")
                            .from(PostFavorite::Table, PostFavorite::UserId)
                            .to(Profile::Table, Profile::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One favorite per user per post
        manager
            .create_index(
                Index::create()
                    .name("idx_post_favorite_post_user")
                    .table(PostFavorite::Table)
                    .col(PostFavorite::PostSlug)
                    .col(PostFavorite::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_favorite_user_created_at")
                    .table(PostFavorite::Table)
                    .col(PostFavorite::UserId)
                    .col(PostFavorite::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostFavorite::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostFavorite {
    Table,
    Id,
    PostSlug,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Post {
    Table,
    Slug,
}

#[derive(Iden)]
enum Profile {
    Table,
    Id,
}
