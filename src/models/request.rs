//! Maintenance request model and the rules tying a request to its target

use mongodb::bson::{oid::ObjectId, Bson, DateTime, Document};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{equipment::Equipment, work_center::WorkCenter};
use crate::error::{AppError, AppResult};

/// Current shape version of request documents
pub const REQUEST_SCHEMA_VERSION: i32 = 2;

/// Placeholder target name when neither equipment nor work center resolves
pub const UNKNOWN_TARGET: &str = "Unknown";

/// Equipment id an update has committed to scrapping; cleared once the equipment is written
pub const PENDING_SCRAP_FIELD: &str = "pending_scrap_equipment_id";

/// Request pipeline stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestStage {
    #[default]
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Repaired,
    Scrap,
}

impl RequestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStage::New => "New",
            RequestStage::InProgress => "In Progress",
            RequestStage::Repaired => "Repaired",
            RequestStage::Scrap => "Scrap",
        }
    }
}

/// Kind of maintenance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestType {
    #[default]
    Corrective,
    Preventive,
}

fn default_priority() -> i32 {
    1
}

/// Stored request document, as written at creation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub schema_version: i32,
    pub subject: String,
    pub created_by_name: Option<String>,
    pub created_by_id: Option<String>,
    pub equipment_id: Option<String>,
    pub work_center_id: Option<String>,
    pub work_center_name: Option<String>,
    pub category: Option<String>,
    pub maintenance_team: Option<String>,
    pub maintenance_team_id: Option<String>,
    pub request_date: Option<String>,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub priority: i32,
    pub technician_name: Option<String>,
    pub technician_id: Option<String>,
    pub scheduled_date: Option<String>,
    pub duration: f64,
    pub stage: RequestStage,
    pub notes: String,
    #[schema(value_type = Option<String>)]
    pub created_at: Option<DateTime>,
}

/// Create request payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    pub created_by_name: Option<String>,
    pub created_by_id: Option<String>,
    pub equipment_id: Option<String>,
    pub work_center_id: Option<String>,
    pub category: Option<String>,
    pub maintenance_team: Option<String>,
    pub maintenance_team_id: Option<String>,
    pub request_date: Option<String>,
    #[serde(rename = "type", default)]
    pub request_type: RequestType,
    #[serde(default = "default_priority")]
    pub priority: i32,
    pub technician_name: Option<String>,
    pub technician_id: Option<String>,
    pub scheduled_date: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Duration cannot be negative"))]
    pub duration: f64,
    #[serde(default)]
    pub stage: RequestStage,
    #[serde(default)]
    pub notes: String,
}

/// What a request points at once its references are resolved
#[derive(Debug, Clone)]
pub enum RequestTarget {
    Equipment(Equipment),
    WorkCenter(WorkCenter),
}

impl RequestTarget {
    /// Equipment wins when both resolved; neither resolving is a validation error
    pub fn resolve(equipment: Option<Equipment>, work_center: Option<WorkCenter>) -> AppResult<Self> {
        match (equipment, work_center) {
            (Some(eq), _) => Ok(RequestTarget::Equipment(eq)),
            (None, Some(wc)) => Ok(RequestTarget::WorkCenter(wc)),
            (None, None) => Err(AppError::Validation(
                "Must select either equipment or work center".to_string(),
            )),
        }
    }
}

impl MaintenanceRequest {
    /// Build the stored record, snapshotting target details and clearing the other target
    pub fn new(data: CreateRequest, target: RequestTarget) -> Self {
        let mut request = MaintenanceRequest {
            id: None,
            schema_version: REQUEST_SCHEMA_VERSION,
            subject: data.subject,
            created_by_name: data.created_by_name,
            created_by_id: data.created_by_id,
            equipment_id: None,
            work_center_id: None,
            work_center_name: None,
            category: data.category,
            maintenance_team: data.maintenance_team,
            maintenance_team_id: data.maintenance_team_id,
            request_date: data.request_date,
            request_type: data.request_type,
            priority: data.priority,
            technician_name: data.technician_name,
            technician_id: data.technician_id,
            scheduled_date: data.scheduled_date,
            duration: data.duration,
            stage: data.stage,
            notes: data.notes,
            created_at: Some(DateTime::now()),
        };

        match target {
            RequestTarget::Equipment(eq) => {
                request.equipment_id = eq.id.map(|id| id.to_hex()).or(data.equipment_id);
                request.category = eq.category.or(request.category);
                request.maintenance_team = eq.maintenance_team.or(request.maintenance_team);
                request.maintenance_team_id = eq.maintenance_team_id.or(request.maintenance_team_id);
            }
            RequestTarget::WorkCenter(wc) => {
                request.work_center_id = wc.id.map(|id| id.to_hex()).or(data.work_center_id);
                request.work_center_name = Some(wc.name);
            }
        }

        request
    }
}

/// Equipment to scrap when `update` moves a request (currently `current`) to Scrap
pub fn scrap_target(update: &Document, current: &Document) -> Option<ObjectId> {
    if update.get_str("stage").ok() != Some(RequestStage::Scrap.as_str()) {
        return None;
    }
    current
        .get_str("equipment_id")
        .ok()
        .and_then(|id| ObjectId::parse_str(id).ok())
}

/// Add the pending scrap marker to `update` when it moves `current` to Scrap.
///
/// The marker rides in the same `$set` as the request change, so an equipment
/// write that never lands can be finished later from the request alone.
pub fn mark_pending_scrap(update: &mut Document, current: &Document) -> Option<ObjectId> {
    let equipment_id = scrap_target(update, current)?;
    update.insert(PENDING_SCRAP_FIELD, equipment_id.to_hex());
    Some(equipment_id)
}

/// Equipment still owed a scrap write by a stored request
pub fn pending_scrap(doc: &Document) -> Option<ObjectId> {
    doc.get_str(PENDING_SCRAP_FIELD)
        .ok()
        .and_then(|id| ObjectId::parse_str(id).ok())
}

/// Display name of a joined request: equipment, else work center, else "Unknown"
pub fn target_name(doc: &Document) -> String {
    ["equipment_name", "work_center_name"]
        .iter()
        .filter_map(|key| doc.get_str(key).ok())
        .find(|name| !name.trim().is_empty())
        .unwrap_or(UNKNOWN_TARGET)
        .to_string()
}

/// Fill the derived name fields on a joined request document
pub fn apply_target_names(doc: &mut Document) {
    for key in ["equipment_name", "work_center_name"] {
        if !doc.contains_key(key) {
            doc.insert(key, Bson::Null);
        }
    }
    let name = target_name(doc);
    doc.insert("target_name", name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::equipment::{CreateEquipment, EquipmentStatus};
    use mongodb::bson::doc;

    fn create_request(json: &str) -> CreateRequest {
        serde_json::from_str(json).unwrap()
    }

    fn equipment() -> Equipment {
        let data: CreateEquipment =
            serde_json::from_str(r#"{"name":"Press","serial_number":"SN-9"}"#).unwrap();
        let mut eq = Equipment::new(data, Some("Hydraulics".into()), Some("Mechanics".into()));
        eq.id = Some(ObjectId::new());
        eq.maintenance_team_id = Some(ObjectId::new().to_hex());
        eq
    }

    fn work_center() -> WorkCenter {
        WorkCenter {
            id: Some(ObjectId::new()),
            name: "Assembly Line 1".into(),
            code: Some("AL1".into()),
            tag: None,
            cost_per_hour: 40.0,
            capacity: 1.0,
            time_efficiency: 100.0,
            oee_target: 90.0,
        }
    }

    #[test]
    fn test_create_defaults() {
        let req = create_request(r#"{"subject":"Leak"}"#);
        assert_eq!(req.priority, 1);
        assert_eq!(req.stage, RequestStage::New);
        assert_eq!(req.request_type, RequestType::Corrective);
        assert_eq!(req.duration, 0.0);
        assert_eq!(req.notes, "");
    }

    #[test]
    fn test_stage_wire_names() {
        let req = create_request(r#"{"subject":"Leak","stage":"In Progress"}"#);
        assert_eq!(req.stage, RequestStage::InProgress);
        assert_eq!(RequestStage::Scrap.as_str(), "Scrap");
    }

    #[test]
    fn test_resolve_requires_a_target() {
        assert!(matches!(
            RequestTarget::resolve(None, None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            RequestTarget::resolve(None, Some(work_center())),
            Ok(RequestTarget::WorkCenter(_))
        ));
    }

    #[test]
    fn test_equipment_wins_over_work_center() {
        let eq = equipment();
        let wc = work_center();
        let data = create_request(&format!(
            r#"{{"subject":"Noise","equipment_id":"{}","work_center_id":"{}"}}"#,
            eq.id.unwrap().to_hex(),
            wc.id.unwrap().to_hex()
        ));

        let target = RequestTarget::resolve(Some(eq.clone()), Some(wc)).unwrap();
        let request = MaintenanceRequest::new(data, target);

        assert_eq!(request.equipment_id, Some(eq.id.unwrap().to_hex()));
        assert!(request.work_center_id.is_none());
        assert!(request.work_center_name.is_none());
        assert_eq!(request.category.as_deref(), Some("Hydraulics"));
        assert_eq!(request.maintenance_team.as_deref(), Some("Mechanics"));
        assert_eq!(request.maintenance_team_id, eq.maintenance_team_id);
    }

    #[test]
    fn test_work_center_target_clears_equipment() {
        let wc = work_center();
        let data = create_request(&format!(
            r#"{{"subject":"Calibrate","equipment_id":"garbage","work_center_id":"{}","category":"General"}}"#,
            wc.id.unwrap().to_hex()
        ));

        let request = MaintenanceRequest::new(data, RequestTarget::WorkCenter(wc.clone()));

        assert!(request.equipment_id.is_none());
        assert_eq!(request.work_center_id, Some(wc.id.unwrap().to_hex()));
        assert_eq!(request.work_center_name.as_deref(), Some("Assembly Line 1"));
        assert_eq!(request.category.as_deref(), Some("General"));
    }

    #[test]
    fn test_stored_shape_uses_type_key() {
        let data = create_request(r#"{"subject":"Leak","type":"Preventive"}"#);
        let request = MaintenanceRequest::new(data, RequestTarget::WorkCenter(work_center()));
        let doc = mongodb::bson::to_document(&request).unwrap();
        assert_eq!(doc.get_str("type").unwrap(), "Preventive");
        assert_eq!(doc.get_str("stage").unwrap(), "New");
        assert_eq!(doc.get("equipment_id"), Some(&Bson::Null));
    }

    #[test]
    fn test_scrap_target_uses_current_equipment() {
        let eq_id = ObjectId::new();
        let current = doc! { "equipment_id": eq_id.to_hex(), "stage": "In Progress" };

        assert_eq!(scrap_target(&doc! { "stage": "Scrap" }, &current), Some(eq_id));
        assert_eq!(scrap_target(&doc! { "stage": "Repaired" }, &current), None);
        assert_eq!(scrap_target(&doc! { "notes": "x" }, &current), None);
    }

    #[test]
    fn test_scrap_target_ignores_work_center_requests() {
        let current = doc! {
            "equipment_id": Bson::Null,
            "work_center_id": ObjectId::new().to_hex(),
        };
        assert_eq!(scrap_target(&doc! { "stage": "Scrap" }, &current), None);
    }

    #[test]
    fn test_scrap_target_reads_pre_update_equipment() {
        let old = ObjectId::new();
        let current = doc! { "equipment_id": old.to_hex() };
        let update = doc! { "stage": "Scrap", "equipment_id": ObjectId::new().to_hex() };
        assert_eq!(scrap_target(&update, &current), Some(old));
    }

    #[test]
    fn test_pending_scrap_marker_pins_pre_update_equipment() {
        let old = ObjectId::new();
        let current = doc! { "equipment_id": old.to_hex(), "stage": "New" };
        let mut update = doc! { "stage": "Scrap", "equipment_id": ObjectId::new().to_hex() };

        assert_eq!(mark_pending_scrap(&mut update, &current), Some(old));
        assert_eq!(update.get_str(PENDING_SCRAP_FIELD).unwrap(), old.to_hex());
        assert_eq!(pending_scrap(&update), Some(old));
    }

    #[test]
    fn test_no_marker_without_scrap_update() {
        let current = doc! { "equipment_id": ObjectId::new().to_hex(), "stage": "Scrap" };
        let mut update = doc! { "equipment_id": ObjectId::new().to_hex() };

        assert_eq!(mark_pending_scrap(&mut update, &current), None);
        assert!(!update.contains_key(PENDING_SCRAP_FIELD));
    }

    #[test]
    fn test_scrap_stage_alone_owes_nothing() {
        // Created directly in Scrap, or retargeted while already in Scrap
        let created_in_scrap = doc! { "stage": "Scrap", "equipment_id": ObjectId::new().to_hex() };
        assert_eq!(pending_scrap(&created_in_scrap), None);

        let mut settled = doc! { "stage": "Scrap", "equipment_id": ObjectId::new().to_hex() };
        settled.insert(PENDING_SCRAP_FIELD, Bson::Null);
        assert_eq!(pending_scrap(&settled), None);
    }

    #[test]
    fn test_target_name_fallbacks() {
        assert_eq!(target_name(&doc! { "equipment_name": "Press", "work_center_name": "AL1" }), "Press");
        assert_eq!(target_name(&doc! { "equipment_name": Bson::Null, "work_center_name": "AL1" }), "AL1");
        assert_eq!(target_name(&doc! { "equipment_name": "", "work_center_name": "" }), "Unknown");
        assert_eq!(target_name(&doc! {}), "Unknown");
    }

    #[test]
    fn test_apply_target_names_fills_missing_keys() {
        let mut doc = doc! { "subject": "Leak" };
        apply_target_names(&mut doc);
        assert_eq!(doc.get("equipment_name"), Some(&Bson::Null));
        assert_eq!(doc.get("work_center_name"), Some(&Bson::Null));
        assert_eq!(doc.get_str("target_name").unwrap(), "Unknown");
    }

    #[test]
    fn test_scrapped_status_name() {
        assert_eq!(EquipmentStatus::Scrapped.as_str(), "Scrapped");
    }
}
