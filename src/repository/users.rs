//! Users repository for database operations

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::FindOptions,
    Collection, Database,
};

use super::{inserted_id, USERS};
use crate::{
    error::{AppError, AppResult},
    models::user::{User, UserRole},
};

#[derive(Clone)]
pub struct UsersRepository {
    collection: Collection<User>,
}

impl UsersRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS),
        }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: ObjectId) -> AppResult<User> {
        self.collection
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }, None).await?)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "email": email }, None)
            .await?;
        Ok(count > 0)
    }

    /// Insert a user, returning its id
    pub async fn create(&self, user: &User) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(user, None).await?;
        inserted_id(result)
    }

    /// List users without their password hash, optionally filtered by role
    pub async fn list(&self, role: Option<UserRole>) -> AppResult<Vec<Document>> {
        let filter = match role {
            Some(role) => doc! { "role": role.as_str() },
            None => doc! {},
        };
        let options = FindOptions::builder()
            .projection(doc! { "password": 0 })
            .sort(doc! { "name": 1 })
            .build();

        let cursor = self
            .collection
            .clone_with_type::<Document>()
            .find(filter, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Set the team a user belongs to
    pub async fn set_team(&self, id: ObjectId, team_id: &str) -> AppResult<()> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": { "team_id": team_id } }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}
