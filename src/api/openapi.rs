//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, catalog, equipment, health, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GearGuard API",
        version = "1.0.0",
        description = "Equipment maintenance tracking REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::list_technicians,
        // Catalog
        catalog::list_categories,
        catalog::get_category,
        catalog::create_category,
        catalog::list_work_centers,
        catalog::get_work_center,
        catalog::create_work_center,
        catalog::list_teams,
        catalog::get_team,
        catalog::create_team,
        catalog::update_team,
        catalog::assign_member,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Requests
        requests::list_requests,
        requests::get_request,
        requests::create_request,
        requests::update_request,
        requests::delete_request,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::user::SignupRequest,
            crate::models::user::SignupResponse,
            // Users
            crate::models::user::UserProfile,
            crate::models::user::UserRole,
            crate::models::user::UserQuery,
            // Catalog
            crate::models::category::Category,
            crate::models::category::CreateCategory,
            crate::models::work_center::WorkCenter,
            crate::models::work_center::CreateWorkCenter,
            crate::models::team::Team,
            crate::models::team::CreateTeam,
            crate::models::team::UpdateTeam,
            crate::models::team::AssignMember,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentStatus,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            equipment::DeleteEquipmentResponse,
            // Requests
            crate::models::request::MaintenanceRequest,
            crate::models::request::CreateRequest,
            crate::models::request::RequestStage,
            crate::models::request::RequestType,
            // Common
            crate::models::CreatedResponse,
            crate::models::StatusResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Signup, login and current profile"),
        (name = "users", description = "User listing"),
        (name = "catalog", description = "Categories, work centers and maintenance teams"),
        (name = "equipment", description = "Equipment management"),
        (name = "requests", description = "Maintenance requests")
    )
)]
pub struct ApiDoc;

/// Registers the bearer token scheme used by `/auth/me`
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
