use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use fingenius_core::summary::{to_summary, user_summary, PortfolioSummary, UserSummary};
use fingenius_core::UserId;
use serde::Deserialize;
use shared::services::Registration;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/users
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    let user = state
        .users
        .register(Registration {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user_summary(&user))))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<UserSummary>> {
    let user = state.users.authenticate(&body.email, &body.password).await?;
    Ok(Json(user_summary(&user)))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> ApiResult<Json<UserSummary>> {
    let user = state.users.get(id).await?;
    Ok(Json(user_summary(&user)))
}

/// DELETE /api/v1/users/:id
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> ApiResult<Json<UserSummary>> {
    let user = state.users.deactivate(id).await?;
    Ok(Json(user_summary(&user)))
}

/// GET /api/v1/users/:id/portfolios
pub async fn list_portfolios(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> ApiResult<Json<Vec<PortfolioSummary>>> {
    let portfolios = state.portfolios.portfolios_of(id).await?;
    Ok(Json(portfolios.iter().map(to_summary).collect()))
}
