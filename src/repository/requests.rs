//! Maintenance requests repository

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::FindOptions,
    Collection, Database,
};

use super::{inserted_id, EQUIPMENT, LIST_LIMIT, REQUESTS, WORK_CENTERS};
use crate::{
    error::{AppError, AppResult},
    models::request::{pending_scrap, MaintenanceRequest, PENDING_SCRAP_FIELD},
};

#[derive(Clone)]
pub struct RequestsRepository {
    collection: Collection<MaintenanceRequest>,
}

/// Left-outer join of requests with their equipment and work center.
///
/// Ids are stored as hex strings, so they are cast to `ObjectId` first; a
/// malformed or missing id casts to null and simply fails to match.
pub fn joined_list_pipeline(limit: i64) -> Vec<Document> {
    vec![
        doc! { "$limit": limit },
        doc! {
            "$addFields": {
                "_eq_oid": {
                    "$convert": { "input": "$equipment_id", "to": "objectId", "onError": null, "onNull": null }
                },
                "_wc_oid": {
                    "$convert": { "input": "$work_center_id", "to": "objectId", "onError": null, "onNull": null }
                },
            }
        },
        doc! {
            "$lookup": { "from": EQUIPMENT, "localField": "_eq_oid", "foreignField": "_id", "as": "_eq" }
        },
        doc! { "$unwind": { "path": "$_eq", "preserveNullAndEmptyArrays": true } },
        doc! {
            "$lookup": { "from": WORK_CENTERS, "localField": "_wc_oid", "foreignField": "_id", "as": "_wc" }
        },
        doc! { "$unwind": { "path": "$_wc", "preserveNullAndEmptyArrays": true } },
        doc! {
            "$addFields": {
                "equipment_name": { "$ifNull": ["$_eq.name", null] },
                "work_center_name": { "$ifNull": ["$_wc.name", { "$ifNull": ["$work_center_name", null] }] },
            }
        },
        doc! { "$project": { "_eq": 0, "_wc": 0, "_eq_oid": 0, "_wc_oid": 0 } },
    ]
}

impl RequestsRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(REQUESTS),
        }
    }

    fn documents(&self) -> Collection<Document> {
        self.collection.clone_with_type()
    }

    /// List requests joined with their target names
    pub async fn list_joined(&self) -> AppResult<Vec<Document>> {
        let cursor = self
            .collection
            .aggregate(joined_list_pipeline(LIST_LIMIT), None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Raw document lookup; updates may have added arbitrary fields
    pub async fn get_document(&self, id: ObjectId) -> AppResult<Document> {
        self.documents()
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
    }

    pub async fn create(&self, request: &MaintenanceRequest) -> AppResult<ObjectId> {
        let result = self.collection.insert_one(request, None).await?;
        inserted_id(result)
    }

    /// Merge arbitrary fields into a request
    pub async fn update(&self, id: ObjectId, fields: Document) -> AppResult<()> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
            .await?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("Request {} not found", id)));
        }
        Ok(())
    }

    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Request not found".to_string()));
        }
        Ok(())
    }

    /// Number of requests pointing at an equipment id
    pub async fn count_by_equipment(&self, equipment_id: &str) -> AppResult<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "equipment_id": equipment_id }, None)
            .await?)
    }

    /// Delete every request pointing at an equipment id
    pub async fn delete_by_equipment(&self, equipment_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .delete_many(doc! { "equipment_id": equipment_id }, None)
            .await?;
        Ok(result.deleted_count)
    }

    /// Requests whose scrap write was started but never confirmed, with the owed equipment
    pub async fn pending_scraps(&self) -> AppResult<Vec<(ObjectId, ObjectId)>> {
        let options = FindOptions::builder()
            .projection(pending_scrap_projection())
            .build();
        let docs: Vec<Document> = self
            .documents()
            .find(pending_scrap_filter(), options)
            .await?
            .try_collect()
            .await?;
        Ok(docs
            .iter()
            .filter_map(|doc| Some((doc.get_object_id("_id").ok()?, pending_scrap(doc)?)))
            .collect())
    }

    /// Drop the pending scrap marker once the equipment write has landed
    pub async fn clear_pending_scrap(&self, id: ObjectId) -> AppResult<()> {
        let mut unset = Document::new();
        unset.insert(PENDING_SCRAP_FIELD, "");
        self.collection
            .update_one(doc! { "_id": id }, doc! { "$unset": unset }, None)
            .await?;
        Ok(())
    }
}

/// Requests carrying a pending scrap marker; the stage alone never qualifies
pub fn pending_scrap_filter() -> Document {
    let mut filter = Document::new();
    filter.insert(PENDING_SCRAP_FIELD, doc! { "$type": "string" });
    filter
}

fn pending_scrap_projection() -> Document {
    let mut projection = doc! { "_id": 1 };
    projection.insert(PENDING_SCRAP_FIELD, 1);
    projection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_caps_before_joining() {
        let pipeline = joined_list_pipeline(LIST_LIMIT);
        assert_eq!(pipeline[0].get_i64("$limit").unwrap(), 100);
    }

    #[test]
    fn test_pipeline_preserves_unmatched_requests() {
        let pipeline = joined_list_pipeline(LIST_LIMIT);
        let unwinds: Vec<&Document> = pipeline
            .iter()
            .filter_map(|stage| stage.get_document("$unwind").ok())
            .collect();
        assert_eq!(unwinds.len(), 2);
        for unwind in unwinds {
            assert!(unwind.get_bool("preserveNullAndEmptyArrays").unwrap());
        }
    }

    #[test]
    fn test_pipeline_joins_both_targets() {
        let pipeline = joined_list_pipeline(LIST_LIMIT);
        let sources: Vec<&str> = pipeline
            .iter()
            .filter_map(|stage| stage.get_document("$lookup").ok())
            .filter_map(|lookup| lookup.get_str("from").ok())
            .collect();
        assert_eq!(sources, vec![EQUIPMENT, WORK_CENTERS]);
    }

    #[test]
    fn test_pending_scrap_filter_ignores_stage() {
        let filter = pending_scrap_filter();
        assert_eq!(filter.len(), 1);
        assert!(!filter.contains_key("stage"));
        assert!(!filter.contains_key("equipment_id"));
        let marker = filter.get_document(PENDING_SCRAP_FIELD).unwrap();
        assert_eq!(marker.get_str("$type").unwrap(), "string");
    }

    #[test]
    fn test_pipeline_drops_join_scratch_fields() {
        let pipeline = joined_list_pipeline(LIST_LIMIT);
        let project = pipeline
            .last()
            .and_then(|stage| stage.get_document("$project").ok())
            .unwrap();
        for key in ["_eq", "_wc", "_eq_oid", "_wc_oid"] {
            assert_eq!(project.get_i32(key).unwrap(), 0);
        }
    }
}
