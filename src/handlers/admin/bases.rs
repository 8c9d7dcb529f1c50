use axum::extract::Path;
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::catalog::{self, CatalogQuery};
use crate::database::manager::DatabaseManager;
use crate::database::models::base::{Base, UpdateBase};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/admin/bases - full catalog listing for moderation, newest first
pub async fn list_bases() -> ApiResult<Vec<Base>> {
    let pool = DatabaseManager::pool().await?;
    let bases = catalog::list_bases(&pool, &CatalogQuery::default()).await?;
    Ok(ApiResponse::success(bases))
}

/// PUT /api/admin/bases/:id - edit a base's fields
pub async fn update_base(
    Path(id): Path<Uuid>,
    Json(edit): Json<UpdateBase>,
) -> ApiResult<Base> {
    let pool = DatabaseManager::pool().await?;
    let base = catalog::update_base(&pool, id, &edit).await?;
    Ok(ApiResponse::success(base))
}

/// DELETE /api/admin/bases/:id - remove a base. Its download history is
/// kept with the base reference nulled out.
pub async fn delete_base(Path(id): Path<Uuid>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    catalog::delete_base(&pool, id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
