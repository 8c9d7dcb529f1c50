use axum::extract::{Path, Query};
use uuid::Uuid;

use crate::database::catalog::{self, CatalogQuery};
use crate::database::manager::DatabaseManager;
use crate::database::models::base::Base;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /bases - browse the catalog with optional filters
/// (hall_type, hall_level, base_type, search), newest first.
pub async fn list_bases(Query(query): Query<CatalogQuery>) -> ApiResult<Vec<Base>> {
    let pool = DatabaseManager::pool().await?;
    let bases = catalog::list_bases(&pool, &query).await?;
    Ok(ApiResponse::success(bases))
}

/// GET /bases/:id - single base detail
pub async fn get_base(Path(id): Path<Uuid>) -> ApiResult<Base> {
    let pool = DatabaseManager::pool().await?;
    let base = catalog::get_base(&pool, id).await?;
    Ok(ApiResponse::success(base))
}
