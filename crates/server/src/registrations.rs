//! Registration API endpoints

use api_types::registration::{
    EventSummary, MyRegistrationListResponse, MyRegistrationView, PageParams,
    ParticipantListResponse, ParticipantView, RegistrationNew, RegistrationView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::Principal;

use crate::{ServerError, events, server::ServerState, to_wire, utc_offset};

pub async fn register(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<RegistrationNew>,
) -> Result<(StatusCode, Json<RegistrationView>), ServerError> {
    let registration = state.engine.register(&principal, payload.event_id).await?;

    let offset = utc_offset()?;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationView {
            id: registration.id,
            user_id: registration.user_id,
            event_id: registration.event_id,
            registration_number: registration.registration_number,
            created_at: to_wire(registration.created_at, &offset),
        }),
    ))
}

pub async fn unregister(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.unregister(id, &principal).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_participants(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Query(page): Query<PageParams>,
) -> Result<Json<ParticipantListResponse>, ServerError> {
    let rows = state
        .engine
        .list_participants(id, page.skip, page.limit)
        .await?;

    let offset = utc_offset()?;
    let participants = rows
        .into_iter()
        .map(|(registration, user)| ParticipantView {
            registration_number: registration.registration_number,
            user_id: user.id,
            username: user.username,
            telegram_id: user.telegram_id,
            registered_at: to_wire(registration.created_at, &offset),
        })
        .collect();

    Ok(Json(ParticipantListResponse { participants }))
}

pub async fn my_registrations(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Query(page): Query<PageParams>,
) -> Result<Json<MyRegistrationListResponse>, ServerError> {
    let rows = state
        .engine
        .list_user_registrations(user.id, page.skip, page.limit)
        .await?;

    let offset = utc_offset()?;
    let registrations = rows
        .into_iter()
        .map(|(registration, event)| MyRegistrationView {
            id: registration.id,
            registration_number: registration.registration_number,
            created_at: to_wire(registration.created_at, &offset),
            event: EventSummary {
                id: event.id,
                title: event.title,
                event_type: event.event_type.map(events::map_type),
                datetime_start: to_wire(event.datetime_start, &offset),
                datetime_end: event.datetime_end.map(|dt| to_wire(dt, &offset)),
                address: event.address,
                status: events::map_status(event.status),
            },
        })
        .collect();

    Ok(Json(MyRegistrationListResponse { registrations }))
}
