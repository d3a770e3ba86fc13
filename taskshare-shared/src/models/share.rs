/// Share model and database operations
///
/// A share grants another user viewer or editor access to a task. Only the
/// task's owner creates shares, and at most one share exists per
/// `(task, user)` pair — enforced by a unique constraint so the
/// check-then-insert cannot race.
///
/// Shares are not removed when a task is soft-deleted; they simply become
/// unreachable because every lookup excludes deleted tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE share_permission AS ENUM ('viewer', 'editor');
///
/// CREATE TABLE shares (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id),
///     user_id UUID NOT NULL REFERENCES users(id),
///     permission share_permission NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (task_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Permission carried by a share grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_permission", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    /// Read-only access
    Viewer,

    /// May update title, priority, and completion; may not delete or share
    Editor,
}

impl SharePermission {
    /// Converts permission to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            SharePermission::Viewer => "viewer",
            SharePermission::Editor => "editor",
        }
    }

    /// Parses a permission from request input
    ///
    /// Anything other than `"viewer"` or `"editor"` is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "viewer" => Some(SharePermission::Viewer),
            "editor" => Some(SharePermission::Editor),
            _ => None,
        }
    }
}

/// A viewer/editor grant from a task's owner to another user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Share {
    pub id: Uuid,

    /// Task being shared
    pub task_id: Uuid,

    /// Grantee
    pub user_id: Uuid,

    /// Granted permission
    pub permission: SharePermission,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a share
#[derive(Debug, Clone)]
pub struct CreateShare {
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub permission: SharePermission,
}

impl Share {
    /// Creates a share
    ///
    /// # Errors
    ///
    /// A duplicate `(task, user)` grant surfaces as a unique constraint
    /// violation; the existing share's permission is left untouched.
    pub async fn create(pool: &PgPool, data: CreateShare) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Share>(
            r#"
            INSERT INTO shares (task_id, user_id, permission)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, user_id, permission, created_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.permission)
        .fetch_one(pool)
        .await
    }

    /// Finds the share for a `(task, user)` pair, if any
    pub async fn find(
        pool: &PgPool,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Share>(
            r#"
            SELECT id, task_id, user_id, permission, created_at
            FROM shares
            WHERE task_id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_parse() {
        assert_eq!(SharePermission::parse("viewer"), Some(SharePermission::Viewer));
        assert_eq!(SharePermission::parse("editor"), Some(SharePermission::Editor));
        assert_eq!(SharePermission::parse("owner"), None);
        assert_eq!(SharePermission::parse("Editor"), None);
        assert_eq!(SharePermission::parse(""), None);
    }

    #[test]
    fn test_permission_as_str() {
        assert_eq!(SharePermission::Viewer.as_str(), "viewer");
        assert_eq!(SharePermission::Editor.as_str(), "editor");
    }

    #[test]
    fn test_permission_serde_lowercase() {
        assert_eq!(
            serde_json::to_value(SharePermission::Editor).unwrap(),
            "editor"
        );
    }
}
