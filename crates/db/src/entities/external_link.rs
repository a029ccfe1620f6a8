//! External link entity (links to other sites shown on the links page).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "external_link")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    pub url: String,

    #[sea_orm(nullable)]
    pub icon: Option<String>,

    /// Manual sort key, ascending.
    #[sea_orm(default_value = 0)]
    pub order: i32,

    #[sea_orm(default_value = true)]
    pub is_visible: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
