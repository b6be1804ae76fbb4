//! Maintenance request service
//!
//! A request targets exactly one of equipment or work center, decided at
//! creation. Moving an equipment request to the Scrap stage scraps the
//! equipment. The two writes are not atomic: the request is written first,
//! carrying a pending scrap marker, and the marker is cleared once the
//! equipment write lands. [`RequestsService::reconcile_scrapped_equipment`]
//! finishes any write whose marker is still set.

use chrono::Utc;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde_json::Value;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::request::{
        apply_target_names, mark_pending_scrap, CreateRequest, MaintenanceRequest, RequestTarget,
        PENDING_SCRAP_FIELD,
    },
    presentation::{parse_id, resolvable_id},
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

/// Turn an arbitrary JSON body into `$set` fields, dropping identifier and marker keys
pub fn update_fields(body: &Value) -> AppResult<Document> {
    if !body.is_object() {
        return Err(AppError::BadRequest(
            "Update body must be a JSON object".to_string(),
        ));
    }
    let mut fields = mongodb::bson::to_document(body)?;
    fields.remove("_id");
    fields.remove("id");
    fields.remove(PENDING_SCRAP_FIELD);
    if fields.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    Ok(fields)
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List requests with equipment, work center and target names
    pub async fn list(&self) -> AppResult<Vec<Document>> {
        let mut requests = self.repository.requests.list_joined().await?;
        for request in requests.iter_mut() {
            apply_target_names(request);
        }
        Ok(requests)
    }

    /// Get a request with names resolved from the current equipment and work center
    pub async fn get_by_id(&self, id: &str) -> AppResult<Document> {
        let oid = parse_id(id)?;
        let mut request = self.repository.requests.get_document(oid).await?;

        let equipment_name = match resolvable_id(request.get_str("equipment_id").ok()) {
            Some(eq_id) => self.repository.equipment.find(eq_id).await?.map(|eq| eq.name),
            None => None,
        };
        let live_work_center = match resolvable_id(request.get_str("work_center_id").ok()) {
            Some(wc_id) => self.repository.work_centers.find(wc_id).await?.map(|wc| wc.name),
            None => None,
        };
        let work_center_name = live_work_center
            .or_else(|| request.get_str("work_center_name").ok().map(str::to_string));

        request.insert("equipment_name", Bson::from(equipment_name));
        request.insert("work_center_name", Bson::from(work_center_name));
        apply_target_names(&mut request);
        Ok(request)
    }

    /// Create a request against equipment or, failing that, a work center
    pub async fn create(&self, data: CreateRequest) -> AppResult<ObjectId> {
        data.validate()?;

        let equipment = match resolvable_id(data.equipment_id.as_deref()) {
            Some(eq_id) => self.repository.equipment.find(eq_id).await?,
            None => None,
        };
        let work_center = match (&equipment, resolvable_id(data.work_center_id.as_deref())) {
            (None, Some(wc_id)) => self.repository.work_centers.find(wc_id).await?,
            _ => None,
        };

        let target = RequestTarget::resolve(equipment, work_center)?;
        let request = MaintenanceRequest::new(data, target);
        let id = self.repository.requests.create(&request).await?;

        tracing::info!("Created request {} ({})", id, request.subject);
        Ok(id)
    }

    /// Merge arbitrary fields; moving an equipment request to Scrap scraps the equipment
    pub async fn update(&self, id: &str, body: &Value) -> AppResult<()> {
        let oid = parse_id(id)?;
        let mut fields = update_fields(body)?;

        let current = self.repository.requests.get_document(oid).await?;
        let scrap = mark_pending_scrap(&mut fields, &current);

        self.repository.requests.update(oid, fields).await?;

        if let Some(equipment_id) = scrap {
            match self.repository.equipment.mark_scrapped(equipment_id, &today()).await {
                Ok(true) => {
                    tracing::info!("Request {} scrapped equipment {}", oid, equipment_id)
                }
                Ok(false) => tracing::warn!(
                    "Request {} moved to Scrap but equipment {} does not exist",
                    oid,
                    equipment_id
                ),
                Err(e) => {
                    tracing::error!(
                        "Request {} moved to Scrap but scrapping equipment {} failed; \
                         left for reconciliation",
                        oid,
                        equipment_id
                    );
                    return Err(e);
                }
            }
            self.repository.requests.clear_pending_scrap(oid).await?;
        }
        Ok(())
    }

    /// Delete a request; scrapped equipment stays scrapped
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = parse_id(id)?;
        self.repository.requests.delete(oid).await
    }

    /// Finish scrap writes that an update started but did not confirm
    pub async fn reconcile_scrapped_equipment(&self) -> AppResult<usize> {
        let pending = self.repository.requests.pending_scraps().await?;
        if pending.is_empty() {
            return Ok(0);
        }

        let owed: Vec<ObjectId> = pending.iter().map(|(_, equipment_id)| *equipment_id).collect();
        let active = self.repository.equipment.not_scrapped_among(owed).await?;

        let date = today();
        for equipment_id in &active {
            self.repository.equipment.mark_scrapped(*equipment_id, &date).await?;
            tracing::warn!("Reconciled scrap status of equipment {}", equipment_id);
        }
        for (request_id, _) in &pending {
            self.repository.requests.clear_pending_scrap(*request_id).await?;
        }
        Ok(active.len())
    }
}
