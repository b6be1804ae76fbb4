//! Maintenance team model

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Stored team document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Team {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub name: String,
    /// Hex ids of the categories this team maintains
    #[serde(default)]
    pub category_ids: Vec<String>,
}

/// Create team request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeam {
    #[validate(length(min = 1, message = "Team name is required"))]
    pub name: String,
    #[serde(default)]
    pub category_ids: Vec<String>,
}

impl From<CreateTeam> for Team {
    fn from(data: CreateTeam) -> Self {
        Team {
            id: None,
            name: data.name,
            category_ids: data.category_ids,
        }
    }
}

/// Update team request
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTeam {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Team name cannot be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<String>>,
}

/// Assign member request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignMember {
    pub user_id: String,
}
