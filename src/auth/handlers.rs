use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginForm, MessageResponse, PublicUser, RegisterRequest, RegisteredResponse, TokenResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        services,
    },
    error::AppResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/health", get(health))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/auth/profile", get(get_profile))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<RegisteredResponse>> {
    let id = services::register(&state.db, &payload).await?;
    Ok(Json(RegisteredResponse {
        message: "User registered successfully".into(),
        id,
    }))
}

#[instrument(skip(state, form), fields(email = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<TokenResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let access_token =
        services::authenticate(&state.db, &keys, &form.username, &form.password).await?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
    }))
}

/// Tokens are stateless; the client is expected to drop its copy.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Logged out. Discard the token on the client.".into(),
    })
}

#[instrument(skip(state, claims), fields(email = %claims.sub))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<PublicUser>> {
    Ok(Json(services::profile(&state.db, &claims).await?))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "auth-service ok" }))
}
