use sqlx::PgPool;
use thiserror::Error;

use crate::database::manager::DatabaseError;
use crate::database::models::rating::{NewRating, Rating};

/// Postgres unique-violation SQLSTATE, raised by the
/// (base_id, browser_fingerprint) constraint.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum RatingError {
    /// Expected path: this fingerprint already rated this base.
    #[error("Already rated")]
    AlreadyRated,

    #[error("Rating must be between 1 and 5, got {0}")]
    OutOfRange(i32),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for RatingError {
    fn from(err: sqlx::Error) -> Self {
        RatingError::Database(DatabaseError::Sqlx(err))
    }
}

/// Insert a rating row. The average/count aggregates on the base are
/// recomputed by a database trigger, never by a client read-modify-write, so
/// concurrent submissions for different fingerprints both count.
pub async fn insert_rating(pool: &PgPool, new: &NewRating) -> Result<Rating, RatingError> {
    if !(1..=5).contains(&new.rating) {
        return Err(RatingError::OutOfRange(new.rating));
    }

    let result = sqlx::query_as::<_, Rating>(
        "INSERT INTO ratings (base_id, ip_address, browser_fingerprint, rating) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, base_id, ip_address, browser_fingerprint, rating, created_at",
    )
    .bind(new.base_id)
    .bind(&new.ip_address)
    .bind(&new.browser_fingerprint)
    .bind(new.rating)
    .fetch_one(pool)
    .await;

    match result {
        Ok(rating) => Ok(rating),
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            Err(RatingError::AlreadyRated)
        }
        Err(err) => Err(err.into()),
    }
}
