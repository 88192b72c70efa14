//! Cities API endpoints (reference data lookups)

use api_types::city::CityView;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CityView>>, ServerError> {
    let cities = state.engine.list_cities().await?;
    Ok(Json(
        cities
            .into_iter()
            .map(|city| CityView {
                id: city.id,
                name: city.name,
            })
            .collect(),
    ))
}
