//! Holiday calendar repository.
//!
//! Public holidays are dated rows; weekly offs are one row per weekday.

use chrono::Utc;
use sqlx::PgPool;

use crate::error::{conflict_on_unique_violation, AppError};
use crate::models::holiday::{Holiday, WeeklyOff};
use crate::types::HolidayId;

const SELECT_COLUMNS: &str = "id, holiday_date, name, description, created_at";

#[derive(Debug, Default, Clone, Copy)]
pub struct HolidayRepository;

impl HolidayRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_all(&self, db: &PgPool) -> Result<Vec<Holiday>, AppError> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM holidays ORDER BY holiday_date ASC");
        Ok(sqlx::query_as::<_, Holiday>(&query).fetch_all(db).await?)
    }

    pub async fn create(&self, db: &PgPool, item: &Holiday) -> Result<Holiday, AppError> {
        let query = format!(
            "INSERT INTO holidays ({SELECT_COLUMNS}) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SELECT_COLUMNS}"
        );
        sqlx::query_as::<_, Holiday>(&query)
            .bind(item.id)
            .bind(item.holiday_date)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.created_at)
            .fetch_one(db)
            .await
            .map_err(|err| {
                conflict_on_unique_violation(err, "A holiday already exists on that date")
            })
    }

    pub async fn delete(&self, db: &PgPool, id: HolidayId) -> Result<(), AppError> {
        let affected = sqlx::query("DELETE FROM holidays WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?
            .rows_affected();
        if affected == 0 {
            return Err(AppError::NotFound("Holiday not found".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WeeklyOffRepository;

impl WeeklyOffRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list(&self, db: &PgPool) -> Result<Vec<WeeklyOff>, AppError> {
        Ok(sqlx::query_as::<_, WeeklyOff>(
            "SELECT weekday, is_active, updated_at FROM weekly_offs ORDER BY weekday ASC",
        )
        .fetch_all(db)
        .await?)
    }

    /// `weekday` is Monday-based (0 = Monday).
    pub async fn set(
        &self,
        db: &PgPool,
        weekday: i16,
        is_active: bool,
    ) -> Result<WeeklyOff, AppError> {
        if !(0..=6).contains(&weekday) {
            return Err(AppError::BadRequest(
                "weekday must be between 0 (Monday) and 6 (Sunday)".into(),
            ));
        }
        Ok(sqlx::query_as::<_, WeeklyOff>(
            "INSERT INTO weekly_offs (weekday, is_active, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (weekday) DO UPDATE \
             SET is_active = EXCLUDED.is_active, updated_at = EXCLUDED.updated_at \
             RETURNING weekday, is_active, updated_at",
        )
        .bind(weekday)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_one(db)
        .await?)
    }
}
