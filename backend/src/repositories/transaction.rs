//! Transaction helpers for multi-table workflow steps.
//!
//! A transaction dropped without [`commit`] rolls back, so an early `?`
//! return leaves neither the ledger nor the domain tables touched.

use sqlx::postgres::PgTransaction;
use sqlx::PgPool;

use crate::error::AppError;

pub async fn begin(db: &PgPool) -> Result<PgTransaction<'static>, AppError> {
    db.begin()
        .await
        .map_err(|e| AppError::InternalServerError(e.into()))
}

pub async fn commit(tx: PgTransaction<'_>) -> Result<(), AppError> {
    tx.commit()
        .await
        .map_err(|e| AppError::InternalServerError(e.into()))
}
