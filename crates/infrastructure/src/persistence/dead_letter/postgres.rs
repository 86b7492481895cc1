//! PostgreSQL dead-letter repository (sqlx).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use staffhub_domain::outbox::{DeadLetter, DeadLetterRepository, OutboxError};
use uuid::Uuid;

fn storage_err(e: sqlx::Error) -> OutboxError {
    OutboxError::Storage {
        message: e.to_string(),
    }
}

#[derive(FromRow)]
struct DeadLetterRow {
    id: Uuid,
    message_id: Uuid,
    event_type: String,
    payload: Vec<u8>,
    error: String,
    failed_at: DateTime<Utc>,
}

impl From<DeadLetterRow> for DeadLetter {
    fn from(row: DeadLetterRow) -> Self {
        Self {
            id: row.id,
            message_id: row.message_id,
            event_type: row.event_type,
            payload: row.payload,
            error: row.error,
            failed_at: row.failed_at,
        }
    }
}

pub struct PostgresDeadLetterRepository {
    pool: PgPool,
}

impl PostgresDeadLetterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), OutboxError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dead_letters (
                id UUID PRIMARY KEY,
                message_id UUID NOT NULL,
                event_type VARCHAR(50) NOT NULL,
                payload BYTEA NOT NULL,
                error TEXT NOT NULL,
                failed_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }
}

#[async_trait]
impl DeadLetterRepository for PostgresDeadLetterRepository {
    async fn append(&self, dead_letter: &DeadLetter) -> Result<(), OutboxError> {
        sqlx::query(
            r#"
            INSERT INTO dead_letters (id, message_id, event_type, payload, error, failed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(dead_letter.id)
        .bind(dead_letter.message_id)
        .bind(&dead_letter.event_type)
        .bind(&dead_letter.payload)
        .bind(&dead_letter.error)
        .bind(dead_letter.failed_at)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<DeadLetter>, OutboxError> {
        let rows: Vec<DeadLetterRow> = sqlx::query_as::<_, DeadLetterRow>(
            r#"
            SELECT id, message_id, event_type, payload, error, failed_at
            FROM dead_letters
            ORDER BY failed_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(rows.into_iter().map(DeadLetter::from).collect())
    }
}
