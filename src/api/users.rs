//! User listing endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;

use crate::{
    error::AppResult,
    models::user::{UserProfile, UserQuery, UserRole},
    presentation::present_all,
};

/// List users, optionally filtered by role
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(UserQuery),
    responses(
        (status = 200, description = "Users without password hashes", body = Vec<UserProfile>)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<Value>>> {
    let users = state.services.users.list_users(query.role).await?;
    Ok(Json(present_all(users)))
}

/// List technicians
#[utoipa::path(
    get,
    path = "/users/technicians",
    tag = "users",
    responses(
        (status = 200, description = "Technicians", body = Vec<UserProfile>)
    )
)]
pub async fn list_technicians(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Value>>> {
    let users = state
        .services
        .users
        .list_users(Some(UserRole::Technician))
        .await?;
    Ok(Json(present_all(users)))
}
