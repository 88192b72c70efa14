//! Events API endpoints

use api_types::event::{
    CitySummary, EventCreated, EventListParams, EventListResponse, EventNew,
    EventState as ApiState, EventStatus as ApiStatus, EventType as ApiType, EventUpdate,
    EventView, OrganizerSummary,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{CreateEventCmd, EventQuery, Principal, UpdateEventCmd};

use crate::{ServerError, server::ServerState, to_wire, utc_offset};

pub(crate) fn map_type(event_type: engine::EventType) -> ApiType {
    match event_type {
        engine::EventType::Tournament => ApiType::Tournament,
        engine::EventType::Training => ApiType::Training,
        engine::EventType::Meeting => ApiType::Meeting,
        engine::EventType::Lectures => ApiType::Lectures,
    }
}

fn map_type_in(event_type: ApiType) -> engine::EventType {
    match event_type {
        ApiType::Tournament => engine::EventType::Tournament,
        ApiType::Training => engine::EventType::Training,
        ApiType::Meeting => engine::EventType::Meeting,
        ApiType::Lectures => engine::EventType::Lectures,
    }
}

pub(crate) fn map_status(status: engine::EventStatus) -> ApiStatus {
    match status {
        engine::EventStatus::Active => ApiStatus::Active,
        engine::EventStatus::Cancelled => ApiStatus::Cancelled,
    }
}

fn map_status_in(status: ApiStatus) -> engine::EventStatus {
    match status {
        ApiStatus::Active => engine::EventStatus::Active,
        ApiStatus::Cancelled => engine::EventStatus::Cancelled,
    }
}

fn map_state(state: engine::EventState) -> ApiState {
    match state {
        engine::EventState::Scheduled => ApiState::Scheduled,
        engine::EventState::InProgress => ApiState::InProgress,
        engine::EventState::Ended => ApiState::Ended,
        engine::EventState::Cancelled => ApiState::Cancelled,
    }
}

fn map_event_view(detail: engine::EventDetail) -> Result<EventView, ServerError> {
    let offset = utc_offset()?;
    Ok(EventView {
        id: detail.event.id,
        title: detail.event.title,
        description: detail.event.description,
        event_type: detail.event.event_type.map(map_type),
        datetime_start: to_wire(detail.event.datetime_start, &offset),
        datetime_end: detail.event.datetime_end.map(|dt| to_wire(dt, &offset)),
        address: detail.event.address,
        city: CitySummary {
            id: detail.city.id,
            name: detail.city.name,
        },
        organizer: OrganizerSummary {
            id: detail.organizer.id,
            username: detail.organizer.username,
            telegram_id: detail.organizer.telegram_id,
        },
        limit_participants: detail.event.limit_participants,
        participants: detail.participants,
        status: map_status(detail.event.status),
        state: map_state(detail.state),
        created_at: to_wire(detail.event.created_at, &offset),
    })
}

pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<EventListParams>,
) -> Result<Json<EventListResponse>, ServerError> {
    let query = EventQuery {
        event_type: params.event_type.map(map_type_in),
        city_id: params.city_id,
        date_from: params.date_from.map(|dt| dt.with_timezone(&Utc)),
        query: params.query,
        skip: params.skip,
        limit: params.limit,
    };

    let details = state.engine.find_events(query).await?;
    let events = details
        .into_iter()
        .map(map_event_view)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(EventListResponse { events }))
}

pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<EventView>, ServerError> {
    let detail = state.engine.event_detail(id).await?;
    Ok(Json(map_event_view(detail)?))
}

pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<EventNew>,
) -> Result<(StatusCode, Json<EventCreated>), ServerError> {
    let event = state
        .engine
        .create_event(CreateEventCmd {
            principal,
            title: payload.title,
            description: payload.description,
            event_type: payload.event_type.map(map_type_in),
            datetime_start: payload.datetime_start.with_timezone(&Utc),
            datetime_end: payload.datetime_end.map(|dt| dt.with_timezone(&Utc)),
            address: payload.address,
            city_id: payload.city_id,
            limit_participants: payload.limit_participants,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(EventCreated { id: event.id })))
}

pub async fn update(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<EventUpdate>,
) -> Result<Json<EventView>, ServerError> {
    state
        .engine
        .update_event(UpdateEventCmd {
            principal,
            event_id: id,
            title: payload.title,
            description: payload.description,
            event_type: payload.event_type.map(map_type_in),
            datetime_start: payload.datetime_start.map(|dt| dt.with_timezone(&Utc)),
            datetime_end: payload.datetime_end.map(|dt| dt.with_timezone(&Utc)),
            address: payload.address,
            city_id: payload.city_id,
            limit_participants: payload.limit_participants,
            status: payload.status.map(map_status_in),
        })
        .await?;

    let detail = state.engine.event_detail(id).await?;
    Ok(Json(map_event_view(detail)?))
}

pub async fn cancel(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<EventView>, ServerError> {
    state.engine.cancel_event(id, &principal).await?;

    let detail = state.engine.event_detail(id).await?;
    Ok(Json(map_event_view(detail)?))
}

pub async fn delete(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_event(id, &principal).await?;
    Ok(StatusCode::NO_CONTENT)
}
