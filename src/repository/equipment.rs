//! Equipment repository

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::FindOptions,
    Collection, Database,
};

use super::{inserted_id, EQUIPMENT, LIST_LIMIT};
use crate::{
    error::{AppError, AppResult},
    models::equipment::{Equipment, EquipmentStatus},
};

#[derive(Clone)]
pub struct EquipmentRepository {
    collection: Collection<Equipment>,
}

impl EquipmentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(EQUIPMENT),
        }
    }

    fn documents(&self) -> Collection<Document> {
        self.collection.clone_with_type()
    }

    /// List equipment, capped at the fixed page size
    pub async fn list(&self) -> AppResult<Vec<Document>> {
        let options = FindOptions::builder().limit(LIST_LIMIT).build();
        let cursor = self.documents().find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Typed lookup used when resolving references
    pub async fn find(&self, id: ObjectId) -> AppResult<Option<Equipment>> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    /// Raw document lookup, keeps fields outside the typed model
    pub async fn get_document(&self, id: ObjectId) -> AppResult<Document> {
        self.documents()
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    pub async fn create(&self, equipment: &Equipment) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(equipment, None).await?;
        inserted_id(result)
    }

    /// Merge the given fields into an equipment record
    pub async fn update(&self, id: ObjectId, fields: Document) -> AppResult<()> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Mark equipment as scrapped; repeating it is harmless
    pub async fn mark_scrapped(&self, id: ObjectId, scrap_date: &str) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": {
                        "status": EquipmentStatus::Scrapped.as_str(),
                        "scrap_date": scrap_date,
                    }
                },
                None,
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    /// Ids of the given equipment that are not yet scrapped
    pub async fn not_scrapped_among(&self, ids: Vec<ObjectId>) -> AppResult<Vec<ObjectId>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let options = FindOptions::builder().projection(doc! { "_id": 1 }).build();
        let docs: Vec<Document> = self
            .documents()
            .find(
                doc! {
                    "_id": { "$in": ids },
                    "status": { "$ne": EquipmentStatus::Scrapped.as_str() },
                },
                options,
            )
            .await?
            .try_collect()
            .await?;
        Ok(docs
            .iter()
            .filter_map(|d| d.get_object_id("_id").ok())
            .collect())
    }

    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }
}
