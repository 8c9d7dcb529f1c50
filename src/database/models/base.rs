use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Game-progression tier a layout is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "hall_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum HallType {
    Th,
    Bh,
}

/// Gameplay purpose tag for a base layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "base_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaseType {
    War,
    Farming,
    Hybrid,
    Cwl,
    Trophy,
    Fun,
    ProgressBase,
}

/// A catalog entry. `download_count`, `average_rating` and `rating_count` are
/// derived counters: the download counter is bumped only through the atomic
/// `increment_download_count` procedure and the rating aggregates are
/// maintained by a trigger on `ratings`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Base {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub layout_link: String,
    pub description: Option<String>,
    pub stats: Option<String>,
    pub tips: Option<String>,
    pub hall_type: HallType,
    pub hall_level: i32,
    pub base_type: BaseType,
    pub download_count: i32,
    pub average_rating: f64,
    pub rating_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a base; counters always start at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBase {
    pub name: String,
    pub image_url: String,
    pub layout_link: String,
    pub description: Option<String>,
    pub stats: Option<String>,
    pub tips: Option<String>,
    pub hall_type: HallType,
    pub hall_level: i32,
    pub base_type: BaseType,
}

/// Editable fields for admin moderation.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBase {
    pub name: String,
    pub image_url: String,
    pub layout_link: String,
    pub description: Option<String>,
    pub stats: Option<String>,
    pub tips: Option<String>,
    pub hall_type: HallType,
    pub hall_level: i32,
    pub base_type: BaseType,
}
