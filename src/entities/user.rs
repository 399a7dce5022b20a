use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Application user. The password hash is written explicitly by the user
/// service (argon2); there is no model-level hashing hook.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    /// Never serialized in API responses; handlers map to a response DTO.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// One of `admin`, `user`, `vendedor`, `bodeguero`
    pub role: String,

    pub active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    #[sea_orm(has_many = "super::manual_inventory::Entity")]
    ManualInventory,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::manual_inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManualInventory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
