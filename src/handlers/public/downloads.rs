use axum::extract::Path;
use axum::http::HeaderMap;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::ratings::{client_ip, user_agent};
use crate::database::manager::DatabaseManager;
use crate::database::{catalog, downloads};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub layout_link: String,
}

/// POST /bases/:id/downloads - hand back the external layout link and log
/// the download.
///
/// Tracking is spawned off the request path: the log insert and the atomic
/// counter bump run in the background, and their failure never blocks the
/// user-visible action of opening the link.
pub async fn track_download(
    Path(base_id): Path<Uuid>,
    headers: HeaderMap,
) -> ApiResult<DownloadResponse> {
    let pool = DatabaseManager::pool().await?;
    let base = catalog::get_base(&pool, base_id).await?;

    let ip_address = client_ip(&headers);
    let agent = user_agent(&headers);

    tokio::spawn(async move {
        if let Err(err) =
            downloads::record_download(&pool, base_id, &ip_address, agent.as_deref()).await
        {
            warn!("Failed to track download for base {}: {}", base_id, err);
        }
    });

    Ok(ApiResponse::success(DownloadResponse {
        layout_link: base.layout_link,
    }))
}
