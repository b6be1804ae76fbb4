//! Work center model

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

fn default_capacity() -> f64 {
    1.0
}

fn default_time_efficiency() -> f64 {
    100.0
}

fn default_oee_target() -> f64 {
    90.0
}

/// Stored work center document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkCenter {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub cost_per_hour: f64,
    #[serde(default = "default_capacity")]
    pub capacity: f64,
    /// Percentage
    #[serde(default = "default_time_efficiency")]
    pub time_efficiency: f64,
    /// Overall equipment effectiveness target, percentage
    #[serde(default = "default_oee_target")]
    pub oee_target: f64,
}

/// Create work center request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWorkCenter {
    #[validate(length(min = 1, message = "Work center name is required"))]
    pub name: String,
    pub code: Option<String>,
    pub tag: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Cost per hour cannot be negative"))]
    pub cost_per_hour: f64,
    #[serde(default = "default_capacity")]
    #[validate(range(min = 0.0, message = "Capacity cannot be negative"))]
    pub capacity: f64,
    #[serde(default = "default_time_efficiency")]
    pub time_efficiency: f64,
    #[serde(default = "default_oee_target")]
    pub oee_target: f64,
}

impl From<CreateWorkCenter> for WorkCenter {
    fn from(data: CreateWorkCenter) -> Self {
        WorkCenter {
            id: None,
            name: data.name,
            code: data.code,
            tag: data.tag,
            cost_per_hour: data.cost_per_hour,
            capacity: data.capacity,
            time_efficiency: data.time_efficiency,
            oee_target: data.oee_target,
        }
    }
}
