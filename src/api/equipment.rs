//! Equipment API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        equipment::{CreateEquipment, Equipment, UpdateEquipment},
        CreatedResponse,
    },
    presentation::{present, present_all},
};

use super::JsonBody;

/// Result of deleting equipment together with its requests
#[derive(Serialize, ToSchema)]
pub struct DeleteEquipmentResponse {
    pub status: String,
    pub deleted_requests: u64,
}

/// List equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    responses(
        (status = 200, description = "Equipment list, at most 100 entries", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Value>>> {
    let equipment = state.services.equipment.list().await?;
    Ok(Json(present_all(equipment)))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment with `request_count`", body = Equipment),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let equipment = state.services.equipment.get_by_id(&id).await?;
    Ok(Json(present(equipment)))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = CreatedResponse),
        (status = 400, description = "Missing name or serial number", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): JsonBody<CreateEquipment>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.services.equipment.create(data).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.to_hex() })))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    WithRejection(Json(data), _): JsonBody<UpdateEquipment>,
) -> AppResult<Json<Value>> {
    let equipment = state.services.equipment.update(&id, data).await?;
    Ok(Json(present(equipment)))
}

/// Delete equipment and its requests
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment deleted", body = DeleteEquipmentResponse),
        (status = 400, description = "Malformed ID", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteEquipmentResponse>> {
    let deleted_requests = state.services.equipment.delete(&id).await?;
    Ok(Json(DeleteEquipmentResponse {
        status: "deleted".to_string(),
        deleted_requests,
    }))
}
