use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, FixedOffset, Utc};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod cities;
mod events;
mod profile;
mod registrations;
mod server;

pub mod types {
    pub mod event {
        pub use api_types::event::{
            EventCreated, EventListParams, EventListResponse, EventNew, EventUpdate, EventView,
        };
    }

    pub mod registration {
        pub use api_types::registration::{
            MyRegistrationListResponse, ParticipantListResponse, RegistrationNew, RegistrationView,
        };
    }

    pub mod user {
        pub use api_types::user::{ProfileUpdate, UserView};
    }

    pub mod city {
        pub use api_types::city::CityView;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::AlreadyRegistered(_)
        | EngineError::EventFull(_)
        | EngineError::EventNotOpen(_) => StatusCode::CONFLICT,
        EngineError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// UTC as a fixed offset for wire timestamps.
pub(crate) fn utc_offset() -> Result<FixedOffset, ServerError> {
    FixedOffset::east_opt(0).ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))
}

pub(crate) fn to_wire(dt: DateTime<Utc>, offset: &FixedOffset) -> DateTime<FixedOffset> {
    dt.with_timezone(offset)
}
