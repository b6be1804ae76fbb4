//! Equipment category model

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Stored category document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Create category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
    pub description: Option<String>,
}

impl From<CreateCategory> for Category {
    fn from(data: CreateCategory) -> Self {
        Category {
            id: None,
            name: data.name,
            description: data.description,
        }
    }
}
