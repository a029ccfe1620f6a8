//! HTML content module entity.
//!
//! A module is a self-contained HTML snippet. How it opens depends on
//! [`LinkType`]: in an isolated iframe overlay, on its own page, or as an
//! external URL in a new tab.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a module is opened from the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    #[sea_orm(string_value = "modal")]
    Modal,
    #[sea_orm(string_value = "page")]
    Page,
    #[sea_orm(string_value = "external")]
    External,
}

impl Default for LinkType {
    fn default() -> Self {
        Self::Modal
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "html_module")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(unique, indexed)]
    pub slug: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Raw HTML.
    #[sea_orm(column_type = "Text")]
    pub content: String,

    #[sea_orm(nullable)]
    pub category_id: Option<String>,

    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,

    pub link_type: LinkType,

    #[sea_orm(nullable)]
    pub external_url: Option<String>,

    #[sea_orm(nullable)]
    pub cover_image: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(default_value = 0)]
    pub order_index: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
