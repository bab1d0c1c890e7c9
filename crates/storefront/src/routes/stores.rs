//! Nearby-store API.

use axum::{
    Json,
    extract::{Query, State},
};
use lapak_core::geo::{self, Coordinates, Ranked, StoreLocation};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query for `/api/stores/nearby`.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
}

/// Stores ordered by distance from the given position, closest first.
pub async fn nearby(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<Ranked<StoreLocation>>>> {
    let origin =
        Coordinates::new(query.lat, query.lng).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ranked = geo::nearby(origin, state.stores().iter().cloned(), query.radius_km)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    tracing::debug!(%origin, results = ranked.len(), "Nearby stores");
    Ok(Json(ranked))
}
