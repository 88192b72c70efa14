use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use std::sync::Arc;

use crate::{cities, events, profile, registrations};
use engine::{Engine, Principal};

static TELEGRAM_ID_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-telegram-id");
static TELEGRAM_USERNAME_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-telegram-username");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// `TypedHeader` for the verified Telegram identity.
///
/// The upstream gateway validates the Mini-App init data and forwards
/// the caller's Telegram id in "x-telegram-id"; this server never sees
/// raw signatures.
#[derive(Debug)]
struct TelegramIdHeader(String);

impl Header for TelegramIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &TELEGRAM_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        if value.trim().is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(TelegramIdHeader(value.trim().to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-telegram-id header"),
        }
    }
}

/// Optional companion header carrying the Telegram username.
#[derive(Debug)]
struct TelegramUsernameHeader(String);

impl Header for TelegramUsernameHeader {
    fn name() -> &'static axum::http::HeaderName {
        &TELEGRAM_USERNAME_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(TelegramUsernameHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-telegram-username header"),
        }
    }
}

async fn auth(
    TypedHeader(telegram_id): TypedHeader<TelegramIdHeader>,
    username: Option<TypedHeader<TelegramUsernameHeader>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let username = username.as_ref().map(|header| header.0.0.as_str());

    // First verified contact provisions the user as a Member.
    let user = state
        .engine
        .get_or_create_user(&telegram_id.0, username)
        .await
        .map_err(|err| {
            tracing::error!("failed to resolve caller identity: {err}");
            StatusCode::UNAUTHORIZED
        })?;

    let principal = Principal {
        user_id: user.id,
        role: user.role,
        city_id: user.city_id,
    };

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    // Catalog reads stay outside the identity layer: anyone may browse.
    let public = Router::new()
        .route("/events", get(events::list))
        .route("/events/{id}", get(events::get_detail))
        .route(
            "/events/{id}/participants",
            get(registrations::list_participants),
        )
        .route("/cities", get(cities::list));

    let authed = Router::new()
        .route("/events", post(events::create))
        .route(
            "/events/{id}",
            axum::routing::patch(events::update).delete(events::delete),
        )
        .route("/events/{id}/cancel", post(events::cancel))
        .route("/registrations", post(registrations::register))
        .route(
            "/registrations/{id}",
            axum::routing::delete(registrations::unregister),
        )
        .route("/me", get(profile::me).patch(profile::update))
        .route("/me/registrations", get(registrations::my_registrations))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    public.merge(authed).with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
