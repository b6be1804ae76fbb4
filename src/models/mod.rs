//! Data models for GearGuard

pub mod category;
pub mod equipment;
pub mod request;
pub mod team;
pub mod user;
pub mod work_center;

// Re-export commonly used types
pub use category::Category;
pub use equipment::{Equipment, EquipmentStatus};
pub use request::{MaintenanceRequest, RequestStage, RequestTarget};
pub use team::Team;
pub use user::{User, UserProfile, UserRole};
pub use work_center::WorkCenter;

use serde::Serialize;
use utoipa::ToSchema;

/// Response carrying the id of a newly inserted document
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: String,
}

/// Response for writes that return no document
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: &str) -> Self {
        Self { status: status.to_string() }
    }
}
