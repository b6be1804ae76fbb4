//! Repository layer for document store operations

pub mod categories;
pub mod equipment;
pub mod migrations;
pub mod requests;
pub mod teams;
pub mod users;
pub mod work_centers;

use mongodb::{
    bson::{doc, oid::ObjectId, Bson},
    results::InsertOneResult,
    Database,
};

use crate::error::{AppError, AppResult};

/// Collection names
pub const USERS: &str = "users";
pub const CATEGORIES: &str = "categories";
pub const TEAMS: &str = "teams";
pub const WORK_CENTERS: &str = "work_centers";
pub const EQUIPMENT: &str = "equipment";
pub const REQUESTS: &str = "requests";

/// Fixed page size for equipment and request listings
pub const LIST_LIMIT: i64 = 100;

/// Main repository struct holding the database handle
#[derive(Clone)]
pub struct Repository {
    pub db: Database,
    pub users: users::UsersRepository,
    pub categories: categories::CategoriesRepository,
    pub teams: teams::TeamsRepository,
    pub work_centers: work_centers::WorkCentersRepository,
    pub equipment: equipment::EquipmentRepository,
    pub requests: requests::RequestsRepository,
}

impl Repository {
    /// Create a new repository on the given database
    pub fn new(db: Database) -> Self {
        Self {
            users: users::UsersRepository::new(&db),
            categories: categories::CategoriesRepository::new(&db),
            teams: teams::TeamsRepository::new(&db),
            work_centers: work_centers::WorkCentersRepository::new(&db),
            equipment: equipment::EquipmentRepository::new(&db),
            requests: requests::RequestsRepository::new(&db),
            db,
        }
    }

    /// Round-trip to the server
    pub async fn ping(&self) -> AppResult<()> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

/// Extract the generated id of an insert
pub(crate) fn inserted_id(result: InsertOneResult) -> AppResult<ObjectId> {
    match result.inserted_id {
        Bson::ObjectId(id) => Ok(id),
        other => Err(AppError::Internal(format!(
            "Unexpected inserted id type: {:?}",
            other
        ))),
    }
}
