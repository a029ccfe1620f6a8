//! Create the auth service's user table.
//!
//! The managed backend already has `auth.users`; this migration only
//! creates it for local development and test databases.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS auth")
            .await?;

        manager
            .create_table(
                Table::create()
                    .table((Auth::Schema, Users::Table))
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string_len(320).null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::LastSignInAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table((Auth::Schema, Users::Table)).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Auth {
    #[iden = "auth"]
    Schema,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    CreatedAt,
    LastSignInAt,
}
