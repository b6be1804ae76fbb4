//! Maintenance request endpoints

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
        request::{CreateRequest, MaintenanceRequest},
        CreatedResponse, StatusResponse,
    },
    presentation::{present, present_all},
};

use super::JsonBody;

/// List requests with their target names
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    responses(
        (status = 200, description = "Requests with `equipment_name`, `work_center_name` and `target_name`", body = Vec<MaintenanceRequest>)
    )
)]
pub async fn list_requests(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Value>>> {
    let requests = state.services.requests.list().await?;
    Ok(Json(present_all(requests)))
}

/// Get a request by ID
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request", body = MaintenanceRequest),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let request = state.services.requests.get_by_id(&id).await?;
    Ok(Json(present(request)))
}

/// Create a request against equipment or a work center
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = CreatedResponse),
        (status = 400, description = "Neither equipment nor work center resolved", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): JsonBody<CreateRequest>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.requests.create(data).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.to_hex() })))
}

/// Merge fields into a request; stage "Scrap" scraps its equipment
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = String, Path, description = "Request ID")),
    request_body(content = Object, description = "Any fields to set"),
    responses(
        (status = 200, description = "Request updated", body = StatusResponse),
        (status = 400, description = "Malformed ID or empty body", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_request(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    WithRejection(Json(body), _): JsonBody<Value>,
) -> AppResult<Json<StatusResponse>> {
    state.services.requests.update(&id, &body).await?;
    Ok(Json(StatusResponse::new("updated")))
}

/// Delete a request
#[utoipa::path(
    delete,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request deleted", body = StatusResponse),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_request(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    state.services.requests.delete(&id).await?;
    Ok(Json(StatusResponse::new("deleted")))
}
