//! Users table and domain user.
//!
//! A user row is created on first verified identity contact and never
//! deleted. The role is stored as its canonical string.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, Role};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub telegram_id: String,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub city_id: Option<i32>,
    pub role: Role,
    pub skill_level: Option<String>,
}

impl User {
    /// Name shown in participant listings and organizer summaries.
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .unwrap_or_else(|| format!("User {}", self.telegram_id))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub telegram_id: String,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub city_id: Option<i32>,
    pub role: String,
    pub skill_level: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cities::Entity",
        from = "Column::CityId",
        to = "super::cities::Column::Id"
    )]
    Cities,
    #[sea_orm(has_many = "super::registrations::Entity")]
    Registrations,
}

impl Related<super::cities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cities.def()
    }
}

impl Related<super::registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            telegram_id: model.telegram_id,
            username: model.username,
            phone: model.phone,
            city_id: model.city_id,
            role: Role::try_from(model.role.as_str())?,
            skill_level: model.skill_level,
        })
    }
}
