use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Role of a user, as carried on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Partner,
    Admin,
}

pub mod city {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CityView {
        pub id: i32,
        pub name: String,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub telegram_id: String,
        pub username: Option<String>,
        pub phone: Option<String>,
        pub city_id: Option<i32>,
        pub role: Role,
        pub skill_level: Option<String>,
    }

    /// Self-service profile update; absent fields are left unchanged.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub username: Option<String>,
        pub phone: Option<String>,
        pub city_id: Option<i32>,
        pub skill_level: Option<String>,
    }
}

pub mod event {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EventType {
        Tournament,
        Training,
        Meeting,
        Lectures,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EventStatus {
        Active,
        Cancelled,
    }

    /// Time-derived classification, included in views so clients do not
    /// re-derive it from timestamps.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EventState {
        Scheduled,
        InProgress,
        Ended,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventNew {
        pub title: String,
        pub description: Option<String>,
        pub event_type: Option<EventType>,
        pub datetime_start: DateTime<FixedOffset>,
        pub datetime_end: Option<DateTime<FixedOffset>>,
        pub address: String,
        pub city_id: i32,
        pub limit_participants: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventUpdate {
        pub title: Option<String>,
        pub description: Option<String>,
        pub event_type: Option<EventType>,
        pub datetime_start: Option<DateTime<FixedOffset>>,
        pub datetime_end: Option<DateTime<FixedOffset>>,
        pub address: Option<String>,
        pub city_id: Option<i32>,
        pub limit_participants: Option<i32>,
        pub status: Option<EventStatus>,
    }

    /// Catalog query string.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct EventListParams {
        pub event_type: Option<EventType>,
        pub city_id: Option<i32>,
        pub date_from: Option<DateTime<FixedOffset>>,
        pub query: Option<String>,
        pub skip: Option<u64>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrganizerSummary {
        pub id: i32,
        pub username: Option<String>,
        pub telegram_id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CitySummary {
        pub id: i32,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventView {
        pub id: i32,
        pub title: String,
        pub description: Option<String>,
        pub event_type: Option<EventType>,
        pub datetime_start: DateTime<FixedOffset>,
        pub datetime_end: Option<DateTime<FixedOffset>>,
        pub address: String,
        pub city: CitySummary,
        pub organizer: OrganizerSummary,
        pub limit_participants: Option<i32>,
        pub participants: i64,
        pub status: EventStatus,
        pub state: EventState,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventListResponse {
        pub events: Vec<EventView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventCreated {
        pub id: i32,
    }
}

pub mod registration {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegistrationNew {
        pub event_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegistrationView {
        pub id: i32,
        pub user_id: i32,
        pub event_id: i32,
        pub registration_number: i32,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantView {
        pub registration_number: i32,
        pub user_id: i32,
        pub username: Option<String>,
        pub telegram_id: String,
        pub registered_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantListResponse {
        pub participants: Vec<ParticipantView>,
    }

    /// Slim event payload for the "my registrations" feed.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventSummary {
        pub id: i32,
        pub title: String,
        pub event_type: Option<event::EventType>,
        pub datetime_start: DateTime<FixedOffset>,
        pub datetime_end: Option<DateTime<FixedOffset>>,
        pub address: String,
        pub status: event::EventStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MyRegistrationView {
        pub id: i32,
        pub registration_number: i32,
        pub created_at: DateTime<FixedOffset>,
        pub event: EventSummary,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MyRegistrationListResponse {
        pub registrations: Vec<MyRegistrationView>,
    }

    /// Pagination for participant and my-registration listings.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PageParams {
        pub skip: Option<u64>,
        pub limit: Option<u64>,
    }
}
