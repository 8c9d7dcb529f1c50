use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::base::{Base, BaseType, HallType, NewBase, UpdateBase};

const BASE_COLUMNS: &str = "id, name, image_url, layout_link, description, stats, tips, \
     hall_type, hall_level, base_type, download_count, average_rating, rating_count, \
     created_at, updated_at";

/// Public browse filters; all optional, combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub hall_type: Option<HallType>,
    pub hall_level: Option<i32>,
    pub base_type: Option<BaseType>,
    pub search: Option<String>,
}

/// List bases, newest first, applying any browse filters.
pub async fn list_bases(pool: &PgPool, query: &CatalogQuery) -> Result<Vec<Base>, DatabaseError> {
    let mut builder: QueryBuilder<sqlx::Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM bases WHERE TRUE", BASE_COLUMNS));

    if let Some(hall_type) = query.hall_type {
        builder.push(" AND hall_type = ").push_bind(hall_type);
    }
    if let Some(hall_level) = query.hall_level {
        builder.push(" AND hall_level = ").push_bind(hall_level);
    }
    if let Some(base_type) = query.base_type {
        builder.push(" AND base_type = ").push_bind(base_type);
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        builder
            .push(" AND name ILIKE ")
            .push_bind(format!("%{}%", search.trim()));
    }

    builder.push(" ORDER BY created_at DESC");

    let bases = builder.build_query_as::<Base>().fetch_all(pool).await?;
    Ok(bases)
}

pub async fn find_base(pool: &PgPool, id: Uuid) -> Result<Option<Base>, DatabaseError> {
    let base = sqlx::query_as::<_, Base>(&format!(
        "SELECT {} FROM bases WHERE id = $1",
        BASE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(base)
}

pub async fn get_base(pool: &PgPool, id: Uuid) -> Result<Base, DatabaseError> {
    find_base(pool, id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Base not found: {}", id)))
}

/// Apply an admin edit; returns the updated row.
pub async fn update_base(pool: &PgPool, id: Uuid, edit: &UpdateBase) -> Result<Base, DatabaseError> {
    let base = sqlx::query_as::<_, Base>(&format!(
        "UPDATE bases SET name = $2, image_url = $3, layout_link = $4, description = $5, \
         stats = $6, tips = $7, hall_type = $8, hall_level = $9, base_type = $10, \
         updated_at = now() \
         WHERE id = $1 RETURNING {}",
        BASE_COLUMNS
    ))
    .bind(id)
    .bind(&edit.name)
    .bind(&edit.image_url)
    .bind(&edit.layout_link)
    .bind(&edit.description)
    .bind(&edit.stats)
    .bind(&edit.tips)
    .bind(edit.hall_type)
    .bind(edit.hall_level)
    .bind(edit.base_type)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound(format!("Base not found: {}", id)))?;

    Ok(base)
}

/// Delete a base. Download history survives via ON DELETE SET NULL.
pub async fn delete_base(pool: &PgPool, id: Uuid) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM bases WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!("Base not found: {}", id)));
    }
    Ok(())
}

/// Insert a bulk-ingest batch in a single statement. Partial failure fails the
/// whole batch; there is no per-row retry.
pub async fn insert_bases(pool: &PgPool, bases: &[NewBase]) -> Result<u64, DatabaseError> {
    if bases.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
        "INSERT INTO bases (name, image_url, layout_link, description, stats, tips, \
         hall_type, hall_level, base_type) ",
    );

    builder.push_values(bases, |mut b, base| {
        b.push_bind(&base.name)
            .push_bind(&base.image_url)
            .push_bind(&base.layout_link)
            .push_bind(&base.description)
            .push_bind(&base.stats)
            .push_bind(&base.tips)
            .push_bind(base.hall_type)
            .push_bind(base.hall_level)
            .push_bind(base.base_type);
    });

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

/// Catalog-wide totals for the admin analytics tab.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogTotals {
    pub bases: i64,
    pub downloads: i64,
    pub ratings: i64,
    pub average_rating: f64,
}

pub async fn totals(pool: &PgPool) -> Result<CatalogTotals, DatabaseError> {
    let row = sqlx::query(
        "SELECT \
            (SELECT COUNT(*) FROM bases) AS bases, \
            (SELECT COALESCE(SUM(download_count), 0)::bigint FROM bases) AS downloads, \
            (SELECT COUNT(*) FROM ratings) AS ratings, \
            (SELECT COALESCE(AVG(rating), 0)::float8 FROM ratings) AS average_rating",
    )
    .fetch_one(pool)
    .await?;

    Ok(CatalogTotals {
        bases: row.try_get("bases")?,
        downloads: row.try_get("downloads")?,
        ratings: row.try_get("ratings")?,
        average_rating: row.try_get("average_rating")?,
    })
}
