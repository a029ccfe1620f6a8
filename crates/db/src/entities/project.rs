//! Project showcase entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    #[sea_orm(string_value = "miniprogram")]
    Miniprogram,
    #[sea_orm(string_value = "app")]
    App,
    #[sea_orm(string_value = "webpage")]
    Webpage,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    pub category: ProjectCategory,

    #[sea_orm(nullable)]
    pub icon: Option<String>,

    /// Downloadable package (APK, zip).
    #[sea_orm(nullable)]
    pub file_url: Option<String>,

    /// QR code image for mini programs.
    #[sea_orm(nullable)]
    pub qr_code_url: Option<String>,

    #[sea_orm(nullable)]
    pub web_url: Option<String>,

    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,

    #[sea_orm(default_value = 0)]
    pub downloads: i32,

    #[sea_orm(default_value = 0)]
    pub views: i32,

    #[sea_orm(default_value = false)]
    pub is_published: bool,

    #[sea_orm(default_value = 0)]
    pub order_index: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
