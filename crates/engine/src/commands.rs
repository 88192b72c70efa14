//! Command structs for engine operations.
//!
//! These types group parameters for write operations and catalog
//! queries, keeping call sites readable and avoiding long argument
//! lists.

use chrono::{DateTime, Utc};

use crate::events::{EventStatus, EventType};
use crate::Principal;

/// Create a new event.
#[derive(Clone, Debug)]
pub struct CreateEventCmd {
    pub principal: Principal,
    pub title: String,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub datetime_start: DateTime<Utc>,
    pub datetime_end: Option<DateTime<Utc>>,
    pub address: String,
    pub city_id: i32,
    pub limit_participants: Option<i32>,
}

impl CreateEventCmd {
    #[must_use]
    pub fn new(
        principal: Principal,
        title: impl Into<String>,
        address: impl Into<String>,
        city_id: i32,
        datetime_start: DateTime<Utc>,
    ) -> Self {
        Self {
            principal,
            title: title.into(),
            description: None,
            event_type: None,
            datetime_start,
            datetime_end: None,
            address: address.into(),
            city_id,
            limit_participants: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    #[must_use]
    pub fn datetime_end(mut self, datetime_end: DateTime<Utc>) -> Self {
        self.datetime_end = Some(datetime_end);
        self
    }

    #[must_use]
    pub fn limit_participants(mut self, limit: i32) -> Self {
        self.limit_participants = Some(limit);
        self
    }
}

/// Update an existing event. Unset fields are left unchanged.
#[derive(Clone, Debug)]
pub struct UpdateEventCmd {
    pub principal: Principal,
    pub event_id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub datetime_start: Option<DateTime<Utc>>,
    pub datetime_end: Option<DateTime<Utc>>,
    pub address: Option<String>,
    pub city_id: Option<i32>,
    pub limit_participants: Option<i32>,
    pub status: Option<EventStatus>,
}

impl UpdateEventCmd {
    #[must_use]
    pub fn new(principal: Principal, event_id: i32) -> Self {
        Self {
            principal,
            event_id,
            title: None,
            description: None,
            event_type: None,
            datetime_start: None,
            datetime_end: None,
            address: None,
            city_id: None,
            limit_participants: None,
            status: None,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    #[must_use]
    pub fn datetime_start(mut self, datetime_start: DateTime<Utc>) -> Self {
        self.datetime_start = Some(datetime_start);
        self
    }

    #[must_use]
    pub fn datetime_end(mut self, datetime_end: DateTime<Utc>) -> Self {
        self.datetime_end = Some(datetime_end);
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn city_id(mut self, city_id: i32) -> Self {
        self.city_id = Some(city_id);
        self
    }

    #[must_use]
    pub fn limit_participants(mut self, limit: i32) -> Self {
        self.limit_participants = Some(limit);
        self
    }

    #[must_use]
    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Catalog query: filters, free-text search, pagination.
#[derive(Clone, Debug, Default)]
pub struct EventQuery {
    pub event_type: Option<EventType>,
    pub city_id: Option<i32>,
    /// Inclusive lower bound on start time. When unset the catalog
    /// excludes events older than one day before now.
    pub date_from: Option<DateTime<Utc>>,
    pub query: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl EventQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    #[must_use]
    pub fn city_id(mut self, city_id: i32) -> Self {
        self.city_id = Some(city_id);
        self
    }

    #[must_use]
    pub fn date_from(mut self, date_from: DateTime<Utc>) -> Self {
        self.date_from = Some(date_from);
        self
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Self-service profile update. Unset fields are left unchanged.
#[derive(Clone, Debug)]
pub struct UpdateProfileCmd {
    pub user_id: i32,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub city_id: Option<i32>,
    pub skill_level: Option<String>,
}

impl UpdateProfileCmd {
    #[must_use]
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            username: None,
            phone: None,
            city_id: None,
            skill_level: None,
        }
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn city_id(mut self, city_id: i32) -> Self {
        self.city_id = Some(city_id);
        self
    }

    #[must_use]
    pub fn skill_level(mut self, skill_level: impl Into<String>) -> Self {
        self.skill_level = Some(skill_level.into());
        self
    }
}
