//! Profile API endpoints (the caller's own user record)

use api_types::{Role as ApiRole, user::{ProfileUpdate, UserView}};
use axum::{Extension, Json, extract::State};
use engine::UpdateProfileCmd;

use crate::{ServerError, server::ServerState};

fn map_role(role: engine::Role) -> ApiRole {
    match role {
        engine::Role::Member => ApiRole::Member,
        engine::Role::Partner => ApiRole::Partner,
        engine::Role::Admin => ApiRole::Admin,
    }
}

fn map_user_view(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        telegram_id: user.telegram_id,
        username: user.username,
        phone: user.phone,
        city_id: user.city_id,
        role: map_role(user.role),
        skill_level: user.skill_level,
    }
}

pub async fn me(Extension(user): Extension<engine::User>) -> Json<UserView> {
    Json(map_user_view(user))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .update_profile(UpdateProfileCmd {
            user_id: user.id,
            username: payload.username,
            phone: payload.phone,
            city_id: payload.city_id,
            skill_level: payload.skill_level,
        })
        .await?;

    Ok(Json(map_user_view(user)))
}
