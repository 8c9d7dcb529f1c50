use axum::extract::Query;
use serde_json::{json, Value};

use crate::database::catalog;
use crate::database::manager::DatabaseManager;
use crate::ingest::{self, ImportTags};
use crate::middleware::{ApiResponse, ApiResult};

/// POST /api/admin/bases/import?hall_type=TH&hall_level=17&base_type=WAR
///
/// Raw CSV body with required columns name, image_path, layout_link.
/// Validation runs before any insert; the batch goes in as one statement and
/// partial failure surfaces as a single error.
pub async fn import_csv(Query(tags): Query<ImportTags>, body: String) -> ApiResult<Value> {
    let rows = ingest::parse_rows(body.as_bytes())?;
    let bases = ingest::build_bases(rows, tags);

    let pool = DatabaseManager::pool().await?;
    let inserted = catalog::insert_bases(&pool, &bases).await?;

    Ok(ApiResponse::created(json!({ "inserted": inserted })))
}
