//! Reference data endpoints: categories, work centers and maintenance teams

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{
    error::AppResult,
    models::{
        category::{Category, CreateCategory},
        team::{AssignMember, CreateTeam, Team, UpdateTeam},
        work_center::{CreateWorkCenter, WorkCenter},
        CreatedResponse, StatusResponse,
    },
    presentation::{present, present_all, present_model},
};

use super::JsonBody;

// Categories

/// List equipment categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "catalog",
    responses(
        (status = 200, description = "Categories sorted by name", body = Vec<Category>)
    )
)]
pub async fn list_categories(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Value>>> {
    let categories = state.services.catalog.list_categories().await?;
    let presented = categories
        .iter()
        .map(present_model)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(presented))
}

/// Get a category
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let category = state.services.catalog.get_category(&id).await?;
    Ok(Json(present_model(&category)?))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "catalog",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = CreatedResponse)
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): JsonBody<CreateCategory>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.catalog.create_category(data).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.to_hex() })))
}

// Work centers

/// List work centers
#[utoipa::path(
    get,
    path = "/work-centers",
    tag = "catalog",
    responses(
        (status = 200, description = "Work centers sorted by name", body = Vec<WorkCenter>)
    )
)]
pub async fn list_work_centers(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Value>>> {
    let work_centers = state.services.catalog.list_work_centers().await?;
    let presented = work_centers
        .iter()
        .map(present_model)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(presented))
}

/// Get a work center
#[utoipa::path(
    get,
    path = "/work-centers/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Work center ID")),
    responses(
        (status = 200, description = "Work center", body = WorkCenter),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Work center not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_work_center(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let work_center = state.services.catalog.get_work_center(&id).await?;
    Ok(Json(present_model(&work_center)?))
}

/// Create a work center
#[utoipa::path(
    post,
    path = "/work-centers",
    tag = "catalog",
    request_body = CreateWorkCenter,
    responses(
        (status = 201, description = "Work center created", body = CreatedResponse),
        (status = 400, description = "Invalid metrics", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_work_center(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): JsonBody<CreateWorkCenter>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.catalog.create_work_center(data).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.to_hex() })))
}

// Teams

/// List teams with their members and categories
#[utoipa::path(
    get,
    path = "/teams",
    tag = "catalog",
    responses(
        (status = 200, description = "Teams with `members` and `categories` arrays", body = Vec<Team>)
    )
)]
pub async fn list_teams(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Value>>> {
    let teams = state.services.catalog.list_teams().await?;
    Ok(Json(present_all(teams)))
}

/// Get a team with its members and categories
#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team", body = Team),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Team not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_team(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let team = state.services.catalog.get_team(&id).await?;
    Ok(Json(present(team)))
}

/// Create a team
#[utoipa::path(
    post,
    path = "/teams",
    tag = "catalog",
    request_body = CreateTeam,
    responses(
        (status = 201, description = "Team created", body = CreatedResponse)
    )
)]
pub async fn create_team(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): JsonBody<CreateTeam>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.catalog.create_team(data).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.to_hex() })))
}

/// Rename a team or replace its categories
#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Team ID")),
    request_body = UpdateTeam,
    responses(
        (status = 200, description = "Updated team", body = Team),
        (status = 404, description = "Team not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_team(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    WithRejection(Json(data), _): JsonBody<UpdateTeam>,
) -> AppResult<Json<Value>> {
    let team = state.services.catalog.update_team(&id, data).await?;
    Ok(Json(present(team)))
}

/// Assign a user to a team
#[utoipa::path(
    post,
    path = "/teams/{id}/assign",
    tag = "catalog",
    params(("id" = String, Path, description = "Team ID")),
    request_body = AssignMember,
    responses(
        (status = 200, description = "User assigned", body = StatusResponse),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Team or user not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn assign_member(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    WithRejection(Json(data), _): JsonBody<AssignMember>,
) -> AppResult<Json<StatusResponse>> {
    state.services.catalog.assign_member(&id, &data.user_id).await?;
    Ok(Json(StatusResponse::new("assigned")))
}
