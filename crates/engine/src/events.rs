//! Events table and domain event.
//!
//! Status transitions are monotonic: active → cancelled, never back.
//! `registration_seq` is the per-event registration counter; it only
//! grows, so sequence numbers are never reused after a withdrawal.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::lifecycle::{self, EventState};
use crate::{City, EngineError, User};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Tournament,
    Training,
    Meeting,
    Lectures,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tournament => "tournament",
            Self::Training => "training",
            Self::Meeting => "meeting",
            Self::Lectures => "lectures",
        }
    }
}

impl TryFrom<&str> for EventType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "tournament" => Ok(Self::Tournament),
            "training" => Ok(Self::Training),
            "meeting" => Ok(Self::Meeting),
            "lectures" => Ok(Self::Lectures),
            other => Err(EngineError::Validation(format!(
                "invalid event type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Active,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for EventStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::Validation(format!(
                "invalid event status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub datetime_start: DateTime<Utc>,
    pub datetime_end: Option<DateTime<Utc>>,
    pub address: String,
    pub city_id: i32,
    pub organizer_id: i32,
    pub limit_participants: Option<i32>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Lifecycle state at `now`. The sole joinability source.
    pub fn state_at(&self, now: DateTime<Utc>) -> EventState {
        lifecycle::classify(self.status, self.datetime_start, self.datetime_end, now)
    }
}

/// An event resolved for presentation: organizer and city summaries, the
/// live participant count, and the lifecycle state at query time.
#[derive(Clone, Debug)]
pub struct EventDetail {
    pub event: Event,
    pub organizer: User,
    pub city: City,
    pub participants: i64,
    pub state: EventState,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub datetime_start: DateTimeUtc,
    pub datetime_end: Option<DateTimeUtc>,
    pub address: String,
    pub city_id: i32,
    pub organizer_id: i32,
    pub limit_participants: Option<i32>,
    pub status: String,
    pub registration_seq: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cities::Entity",
        from = "Column::CityId",
        to = "super::cities::Column::Id"
    )]
    Cities,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OrganizerId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::registrations::Entity")]
    Registrations,
}

impl Related<super::cities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cities.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Event {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            title: model.title,
            description: model.description,
            event_type: model
                .event_type
                .as_deref()
                .map(EventType::try_from)
                .transpose()?,
            datetime_start: model.datetime_start,
            datetime_end: model.datetime_end,
            address: model.address,
            city_id: model.city_id,
            organizer_id: model.organizer_id,
            limit_participants: model.limit_participants,
            status: EventStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}
