//! Categories repository

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
    Collection, Database,
};

use super::{inserted_id, CATEGORIES};
use crate::{error::AppResult, models::category::Category};

#[derive(Clone)]
pub struct CategoriesRepository {
    collection: Collection<Category>,
}

impl CategoriesRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(CATEGORIES),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.collection.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find(&self, id: ObjectId) -> AppResult<Option<Category>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    pub async fn create(&self, category: &Category) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(category, None).await?;
        inserted_id(result)
    }
}
