//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_auth_users_table;
mod m20250101_000002_create_profile_table;
mod m20250101_000003_create_category_table;
mod m20250101_000004_create_post_table;
mod m20250101_000005_create_comment_table;
mod m20250101_000006_create_post_like_table;
mod m20250101_000007_create_post_favorite_table;
mod m20250101_000008_create_external_link_table;
mod m20250101_000009_create_personal_link_table;
mod m20250101_000010_create_project_table;
mod m20250101_000011_create_html_module_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_auth_users_table::Migration),
            Box::new(m20250101_000002_create_profile_table::Migration),
            Box::new(m20250101_000003_create_category_table::Migration),
            Box::new(m20250101_000004_create_post_table::Migration),
            Box::new(m20250101_000005_create_comment_table::Migration),
            Box::new(m20250101_000006_create_post_like_table::Migration),
            Box::new(m20250101_000007_create_post_favorite_table::Migration),
            Box::new(m20250101_000008_create_external_link_table::Migration),
            Box::new(m20250101_000009_create_personal_link_table::Migration),
            Box::new(m20250101_000010_create_project_table::Migration),
            Box::new(m20250101_000011_create_html_module_table::Migration),
        ]
    }
}
