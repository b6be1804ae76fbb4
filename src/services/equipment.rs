//! Equipment service

use mongodb::bson::{oid::ObjectId, Document};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, UpdateEquipment},
    presentation::{parse_id, resolvable_id},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Document>> {
        self.repository.equipment.list().await
    }

    /// Get equipment with a live count of the requests pointing at it
    pub async fn get_by_id(&self, id: &str) -> AppResult<Document> {
        let oid = parse_id(id)?;
        let mut doc = self.repository.equipment.get_document(oid).await?;
        let count = self.repository.requests.count_by_equipment(&oid.to_hex()).await?;
        doc.insert("request_count", count as i64);
        Ok(doc)
    }

    pub async fn create(&self, data: CreateEquipment) -> AppResult<ObjectId> {
        data.validate()?;

        let category = self.category_name(data.category_id.as_deref()).await?;
        let maintenance_team = self.team_name(data.maintenance_team_id.as_deref()).await?;

        let equipment = Equipment::new(data, category, maintenance_team);
        let id = self.repository.equipment.create(&equipment).await?;
        tracing::info!("Created equipment {} ({})", id, equipment.name);
        Ok(id)
    }

    pub async fn update(&self, id: &str, data: UpdateEquipment) -> AppResult<Document> {
        let oid = parse_id(id)?;
        data.validate()?;

        let mut fields = mongodb::bson::to_document(&data)?;
        if fields.is_empty() {
            return Err(AppError::Validation(
                "At least one field must be provided for update".to_string(),
            ));
        }
        if data.category_id.is_some() {
            let name = self.category_name(data.category_id.as_deref()).await?;
            fields.insert("category", name);
        }
        if data.maintenance_team_id.is_some() {
            let name = self.team_name(data.maintenance_team_id.as_deref()).await?;
            fields.insert("maintenance_team", name);
        }

        self.repository.equipment.update(oid, fields).await?;
        self.repository.equipment.get_document(oid).await
    }

    /// Delete equipment and every request pointing at it; returns how many requests went with it.
    ///
    /// Requests are removed before the equipment itself.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let oid = parse_id(id)?;
        self.repository.equipment.get_document(oid).await?;

        let deleted = self.repository.requests.delete_by_equipment(&oid.to_hex()).await?;
        self.repository.equipment.delete(oid).await?;
        tracing::info!("Deleted equipment {} and {} linked requests", oid, deleted);
        Ok(deleted)
    }

    async fn category_name(&self, category_id: Option<&str>) -> AppResult<Option<String>> {
        let Some(oid) = resolvable_id(category_id) else {
            return Ok(None);
        };
        let name = self.repository.categories.find(oid).await?.map(|c| c.name);
        if name.is_none() {
            tracing::warn!("Category {} not found, leaving name unset", oid);
        }
        Ok(name)
    }

    async fn team_name(&self, team_id: Option<&str>) -> AppResult<Option<String>> {
        let Some(oid) = resolvable_id(team_id) else {
            return Ok(None);
        };
        let name = self.repository.teams.find(oid).await?.map(|t| t.name);
        if name.is_none() {
            tracing::warn!("Maintenance team {} not found, leaving name unset", oid);
        }
        Ok(name)
    }
}
