//! Work centers repository

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
    Collection, Database,
};

use super::{inserted_id, WORK_CENTERS};
use crate::{error::AppResult, models::work_center::WorkCenter};

#[derive(Clone)]
pub struct WorkCentersRepository {
    collection: Collection<WorkCenter>,
}

impl WorkCentersRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(WORK_CENTERS),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<WorkCenter>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.collection.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find(&self, id: ObjectId) -> AppResult<Option<WorkCenter>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    pub async fn create(&self, work_center: &WorkCenter) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(work_center, None).await?;
        inserted_id(result)
    }
}
