use crate::database::catalog::{self, CatalogTotals};
use crate::database::manager::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/admin/analytics - catalog-wide totals for the analytics tab
pub async fn totals() -> ApiResult<CatalogTotals> {
    let pool = DatabaseManager::pool().await?;
    let totals = catalog::totals(&pool).await?;
    Ok(ApiResponse::success(totals))
}
