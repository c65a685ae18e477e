use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::instrument;

use super::{
    dto::{NewWorkshop, SearchQuery},
    repo_types::Workshop,
    services,
};
use crate::{error::AppResult, state::AppState};

pub fn workshop_routes() -> Router<AppState> {
    Router::new()
        .route("/workshops", get(list_workshops).post(create_workshop))
        .route("/workshops/search", get(search_workshops))
        .route("/workshops/health", get(health))
}

#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_workshop(
    State(state): State<AppState>,
    Json(payload): Json<NewWorkshop>,
) -> AppResult<Json<Workshop>> {
    let today = OffsetDateTime::now_utc().date();
    Ok(Json(
        services::create_workshop(&state.db, &payload, today).await?,
    ))
}

#[instrument(skip(state))]
pub async fn list_workshops(State(state): State<AppState>) -> AppResult<Json<Vec<Workshop>>> {
    Ok(Json(services::list_available(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn search_workshops(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Workshop>>> {
    Ok(Json(services::search(&state.db, &query).await?))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "workshops-service ok" }))
}
