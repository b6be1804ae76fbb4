//! Startup schema migrations
//!
//! Older equipment documents predate `status`/`scrap_date`, older requests
//! predate work center targets. Each step only touches documents without the
//! current `schema_version`, so running it again is a no-op.

use mongodb::{
    bson::{doc, Bson, DateTime, Document},
    options::{IndexOptions, UpdateOptions},
    Collection, Database, IndexModel,
};

use super::{EQUIPMENT, REQUESTS, USERS};
use crate::{
    error::AppResult,
    models::{
        equipment::{EquipmentStatus, EQUIPMENT_SCHEMA_VERSION},
        request::REQUEST_SCHEMA_VERSION,
    },
};

const MIGRATIONS: &str = "schema_migrations";

/// Field backfills applied to one collection: `(field, default)` pairs
struct Backfill {
    collection: &'static str,
    version: i32,
    defaults: Vec<(&'static str, Bson)>,
}

fn backfills() -> Vec<Backfill> {
    vec![
        Backfill {
            collection: EQUIPMENT,
            version: EQUIPMENT_SCHEMA_VERSION,
            defaults: vec![
                ("status", Bson::String(EquipmentStatus::Active.as_str().to_string())),
                ("scrap_date", Bson::Null),
            ],
        },
        Backfill {
            collection: REQUESTS,
            version: REQUEST_SCHEMA_VERSION,
            defaults: vec![
                ("work_center_id", Bson::Null),
                ("work_center_name", Bson::Null),
            ],
        },
    ]
}

/// Filter matching documents older than `version`
fn outdated(version: i32) -> Document {
    doc! {
        "$or": [
            { "schema_version": { "$exists": false } },
            { "schema_version": { "$lt": version } },
        ]
    }
}

/// Bring stored documents up to the current schema and ensure indexes
pub async fn run(db: &Database) -> AppResult<()> {
    let users: Collection<Document> = db.collection(USERS);
    users
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            None,
        )
        .await?;

    for backfill in backfills() {
        let collection: Collection<Document> = db.collection(backfill.collection);

        for (field, default) in &backfill.defaults {
            let mut filter = outdated(backfill.version);
            filter.insert(*field, doc! { "$exists": false });
            let mut set = Document::new();
            set.insert(*field, default.clone());
            let result = collection
                .update_many(filter, doc! { "$set": set }, None)
                .await?;
            if result.modified_count > 0 {
                tracing::info!(
                    "Backfilled {} on {} {} documents",
                    field,
                    result.modified_count,
                    backfill.collection
                );
            }
        }

        let result = collection
            .update_many(
                outdated(backfill.version),
                doc! { "$set": { "schema_version": backfill.version } },
                None,
            )
            .await?;

        db.collection::<Document>(MIGRATIONS)
            .update_one(
                doc! { "_id": format!("{}_v{}", backfill.collection, backfill.version) },
                doc! { "$setOnInsert": { "applied_at": DateTime::now() } },
                UpdateOptions::builder().upsert(true).build(),
            )
            .await?;

        tracing::info!(
            "{} schema at v{} ({} documents migrated)",
            backfill.collection,
            backfill.version,
            result.modified_count
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outdated_filter_matches_missing_and_older_versions() {
        let filter = outdated(2);
        let branches = filter.get_array("$or").unwrap();
        assert_eq!(branches.len(), 2);
        let older = branches[1].as_document().unwrap().get_document("schema_version").unwrap();
        assert_eq!(older.get_i32("$lt").unwrap(), 2);
    }

    #[test]
    fn test_equipment_backfill_defaults_to_active() {
        let backfill = backfills().into_iter().find(|b| b.collection == EQUIPMENT).unwrap();
        assert!(backfill
            .defaults
            .iter()
            .any(|(field, value)| *field == "status" && value.as_str() == Some("Active")));
    }
}
