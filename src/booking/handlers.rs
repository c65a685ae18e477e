use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{dto::ReserveRequest, repo_types::Booking, services};
use crate::{error::AppResult, state::AppState};

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/booking/reserve", post(reserve))
        .route("/booking/user/:email", get(list_user_bookings))
        .route("/booking/health", get(health))
}

#[instrument(skip(state, payload), fields(email = %payload.user_email, workshop_id = payload.workshop_id))]
pub async fn reserve(
    State(state): State<AppState>,
    Json(payload): Json<ReserveRequest>,
) -> AppResult<Json<Booking>> {
    Ok(Json(services::reserve(&state.db, &payload).await?))
}

#[instrument(skip(state))]
pub async fn list_user_bookings(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<Vec<Booking>>> {
    Ok(Json(services::list_by_user(&state.db, &email).await?))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "booking-service ok" }))
}
