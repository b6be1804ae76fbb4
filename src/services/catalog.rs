//! Reference data: categories, maintenance teams and work centers

use mongodb::bson::{oid::ObjectId, Document};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        category::{Category, CreateCategory},
        team::{CreateTeam, Team, UpdateTeam},
        work_center::{CreateWorkCenter, WorkCenter},
    },
    presentation::parse_id,
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Categories

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    pub async fn get_category(&self, id: &str) -> AppResult<Category> {
        let id = parse_id(id)?;
        self.repository
            .categories
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn create_category(&self, data: CreateCategory) -> AppResult<ObjectId> {
        data.validate()?;
        self.repository.categories.create(&Category::from(data)).await
    }

    // Work centers

    pub async fn list_work_centers(&self) -> AppResult<Vec<WorkCenter>> {
        self.repository.work_centers.list().await
    }

    pub async fn get_work_center(&self, id: &str) -> AppResult<WorkCenter> {
        let id = parse_id(id)?;
        self.repository
            .work_centers
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Work center {} not found", id)))
    }

    pub async fn create_work_center(&self, data: CreateWorkCenter) -> AppResult<ObjectId> {
        data.validate()?;
        self.repository.work_centers.create(&WorkCenter::from(data)).await
    }

    // Teams

    /// Teams with their members and categories
    pub async fn list_teams(&self) -> AppResult<Vec<Document>> {
        self.repository.teams.list_with_members().await
    }

    pub async fn get_team(&self, id: &str) -> AppResult<Document> {
        let id = parse_id(id)?;
        self.repository.teams.get_with_members(id).await
    }

    pub async fn create_team(&self, data: CreateTeam) -> AppResult<ObjectId> {
        data.validate()?;
        self.repository.teams.create(&Team::from(data)).await
    }

    pub async fn update_team(&self, id: &str, data: UpdateTeam) -> AppResult<Document> {
        let id = parse_id(id)?;
        data.validate()?;

        let fields = mongodb::bson::to_document(&data)?;
        if fields.is_empty() {
            return Err(AppError::Validation(
                "At least one field must be provided for update".to_string(),
            ));
        }
        self.repository.teams.update(id, fields).await?;
        self.repository.teams.get_with_members(id).await
    }

    /// Put a user on a team; assigning twice leaves the same state
    pub async fn assign_member(&self, team_id: &str, user_id: &str) -> AppResult<()> {
        let team_oid = parse_id(team_id)?;
        let user_oid = parse_id(user_id)?;

        if self.repository.teams.find(team_oid).await?.is_none() {
            return Err(AppError::NotFound(format!("Team {} not found", team_oid)));
        }
        self.repository
            .users
            .set_team(user_oid, &team_oid.to_hex())
            .await?;

        tracing::info!("Assigned user {} to team {}", user_oid, team_oid);
        Ok(())
    }
}
