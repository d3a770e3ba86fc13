/// Audit log model
///
/// Immutable records of admin actions. The only writer is the admin force
/// soft-delete, which inserts its entry inside the same transaction that
/// flips the task's deleted flag.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE audit_logs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     action TEXT NOT NULL,
///     admin_email VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// An immutable record of an admin action
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditLog {
    pub id: Uuid,

    /// Free-text description of the action, e.g. "Deleted task <id>"
    pub action: String,

    /// Email of the acting admin
    pub admin_email: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating an audit log entry
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub action: String,
    pub admin_email: String,
}

impl AuditLog {
    /// Inserts an audit log entry
    ///
    /// Takes any executor so it can run inside the caller's transaction.
    pub async fn create<'e, E>(executor: E, data: CreateAuditLog) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (action, admin_email)
            VALUES ($1, $2)
            RETURNING id, action, admin_email, created_at
            "#,
        )
        .bind(data.action)
        .bind(data.admin_email)
        .fetch_one(executor)
        .await
    }

    /// Lists all audit entries, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT id, action, admin_email, created_at
            FROM audit_logs
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
