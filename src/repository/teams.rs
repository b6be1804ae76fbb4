//! Teams repository
//!
//! Team listings are derived views: members are the users whose `team_id`
//! matches the team, categories are those listed in `category_ids`.

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection, Database,
};

use super::{inserted_id, CATEGORIES, TEAMS, USERS};
use crate::{
    error::{AppError, AppResult},
    models::team::Team,
};

#[derive(Clone)]
pub struct TeamsRepository {
    collection: Collection<Team>,
}

/// Join stages that attach `members` and `categories` to each team
pub fn members_and_categories_stages() -> Vec<Document> {
    vec![
        doc! {
            "$lookup": {
                "from": USERS,
                "let": { "team_id": { "$toString": "$_id" } },
                "pipeline": [
                    { "$match": { "$expr": { "$eq": ["$team_id", "$$team_id"] } } },
                    { "$project": { "password": 0 } },
                ],
                "as": "members",
            }
        },
        doc! {
            "$lookup": {
                "from": CATEGORIES,
                "let": { "category_ids": { "$ifNull": ["$category_ids", []] } },
                "pipeline": [
                    { "$match": { "$expr": { "$in": [{ "$toString": "$_id" }, "$$category_ids"] } } },
                ],
                "as": "categories",
            }
        },
    ]
}

impl TeamsRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(TEAMS),
        }
    }

    /// List all teams with their members and categories
    pub async fn list_with_members(&self) -> AppResult<Vec<Document>> {
        let mut pipeline = vec![doc! { "$sort": { "name": 1 } }];
        pipeline.extend(members_and_categories_stages());

        let cursor = self.collection.aggregate(pipeline, None).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Get one team with its members and categories
    pub async fn get_with_members(&self, id: ObjectId) -> AppResult<Document> {
        let mut pipeline = vec![doc! { "$match": { "_id": id } }];
        pipeline.extend(members_and_categories_stages());

        let mut teams: Vec<Document> = self
            .collection
            .aggregate(pipeline, None)
            .await?
            .try_collect()
            .await?;
        teams
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))
    }

    pub async fn find(&self, id: ObjectId) -> AppResult<Option<Team>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    pub async fn create(&self, team: &Team) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(team, None).await?;
        inserted_id(result)
    }

    /// Merge the given fields into a team
    pub async fn update(&self, id: ObjectId, fields: Document) -> AppResult<()> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Team {} not found", id)));
        }
        Ok(())
    }
}
