//! Equipment model

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Current shape version of equipment documents
pub const EQUIPMENT_SCHEMA_VERSION: i32 = 2;

/// Equipment lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EquipmentStatus {
    #[default]
    Active,
    Scrapped,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Active => "Active",
            EquipmentStatus::Scrapped => "Scrapped",
        }
    }
}

fn default_company() -> String {
    "My Company (SF)".to_string()
}

fn default_department() -> Option<String> {
    Some("Admin".to_string())
}

/// Stored equipment document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Equipment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub schema_version: i32,
    pub name: String,
    pub serial_number: String,
    pub category_id: Option<String>,
    /// Category name resolved when the equipment was created
    pub category: Option<String>,
    pub maintenance_team_id: Option<String>,
    /// Team name resolved when the equipment was created
    pub maintenance_team: Option<String>,
    #[serde(default = "default_company")]
    pub company: String,
    pub used_by: Option<String>,
    pub department: Option<String>,
    pub technician_name: Option<String>,
    pub location: Option<String>,
    pub work_center: Option<String>,
    pub description: Option<String>,
    pub assigned_date: Option<String>,
    #[serde(default)]
    pub status: EquipmentStatus,
    /// Date (YYYY-MM-DD) the equipment was scrapped
    pub scrap_date: Option<String>,
    #[schema(value_type = Option<String>)]
    pub created_at: Option<DateTime>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Equipment name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    pub category_id: Option<String>,
    pub maintenance_team_id: Option<String>,
    #[serde(default = "default_company")]
    pub company: String,
    pub used_by: Option<String>,
    #[serde(default = "default_department")]
    pub department: Option<String>,
    pub technician_name: Option<String>,
    pub location: Option<String>,
    pub work_center: Option<String>,
    pub description: Option<String>,
    pub assigned_date: Option<String>,
}

impl Equipment {
    /// Build a new record; display names are filled from whatever references resolved
    pub fn new(data: CreateEquipment, category: Option<String>, maintenance_team: Option<String>) -> Self {
        Equipment {
            id: None,
            schema_version: EQUIPMENT_SCHEMA_VERSION,
            name: data.name,
            serial_number: data.serial_number,
            category_id: data.category_id,
            category,
            maintenance_team_id: data.maintenance_team_id,
            maintenance_team,
            company: data.company,
            used_by: data.used_by,
            department: data.department,
            technician_name: data.technician_name,
            location: data.location,
            work_center: data.work_center,
            description: data.description,
            assigned_date: data.assigned_date,
            status: EquipmentStatus::Active,
            scrap_date: None,
            created_at: Some(DateTime::now()),
        }
    }
}

/// Update equipment request; only provided fields are written
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Equipment name cannot be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_center: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_date: Option<String>,
}
