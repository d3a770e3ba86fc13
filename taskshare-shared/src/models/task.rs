/// Task model and database operations
///
/// Tasks are owned by exactly one user; ownership never transfers. Deletion
/// is always a soft delete: the `deleted` flag is set and the row retained.
/// Every lookup here excludes deleted tasks, so a soft-deleted task behaves
/// as nonexistent to owners and grantees alike. The only path that still
/// touches a deleted task's row is the admin audit trail.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('high', 'medium', 'low');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     priority task_priority NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     deleted BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::audit_log::{AuditLog, CreateAuditLog};
use super::share::SharePermission;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Converts priority to its wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// A user-owned task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id (UUID v4)
    pub id: Uuid,

    pub title: String,

    pub priority: Priority,

    pub completed: bool,

    /// Owning user, immutable after creation
    pub owner_id: Uuid,

    /// Soft-delete flag; a deleted task is invisible to normal operations
    pub deleted: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub priority: Priority,
    pub owner_id: Uuid,
}

/// Input for updating a task's mutable fields
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub priority: Priority,
    pub completed: bool,
}

/// A task joined with the permission a grantee holds on it
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SharedTask {
    #[sqlx(flatten)]
    pub task: Task,

    pub permission: SharePermission,
}

/// A grantee entry in the admin task fan-out
#[derive(Debug, Clone, Serialize)]
pub struct TaskGrant {
    pub user_email: String,
    pub permission: SharePermission,
}

/// Admin view of a task: owner email plus all grants
#[derive(Debug, Clone, Serialize)]
pub struct TaskWithShares {
    pub id: Uuid,
    pub title: String,
    pub priority: Priority,
    pub completed: bool,
    pub owner_email: String,
    pub shared_with: Vec<TaskGrant>,
}

impl TaskWithShares {
    /// All emails associated with the task (owner first)
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.owner_email.as_str())
            .chain(self.shared_with.iter().map(|g| g.user_email.as_str()))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FanOutRow {
    id: Uuid,
    title: String,
    priority: Priority,
    completed: bool,
    owner_email: String,
    shared_email: Option<String>,
    shared_permission: Option<SharePermission>,
}

impl Task {
    /// Creates a new task; the creator becomes the owner
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, priority, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, priority, completed, owner_id, deleted, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.priority)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await
    }

    /// Finds a live (not soft-deleted) task by id
    pub async fn find_active(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, priority, completed, owner_id, deleted, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a user's own live tasks
    pub async fn list_owned(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, priority, completed, owner_id, deleted, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1 AND deleted = FALSE
            ORDER BY created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Lists live tasks shared with a user, with the granted permission
    pub async fn list_shared_with(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<SharedTask>, sqlx::Error> {
        sqlx::query_as::<_, SharedTask>(
            r#"
            SELECT t.id, t.title, t.priority, t.completed, t.owner_id, t.deleted,
                   t.created_at, t.updated_at, s.permission
            FROM tasks t
            JOIN shares s ON s.task_id = t.id
            WHERE s.user_id = $1 AND t.deleted = FALSE
            ORDER BY t.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Updates a live task's title, priority, and completion flag
    ///
    /// Returns `None` if the task is absent or soft-deleted.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2, priority = $3, completed = $4, updated_at = NOW()
            WHERE id = $1 AND deleted = FALSE
            RETURNING id, title, priority, completed, owner_id, deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.priority)
        .bind(data.completed)
        .fetch_optional(pool)
        .await
    }

    /// Soft-deletes a live task
    ///
    /// Returns `true` if the flag was flipped, `false` if the task was
    /// already deleted or never existed. The row is retained.
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Admin force soft-delete with an audit record
    ///
    /// The flag flip and the audit insert run in one transaction: both
    /// succeed or neither does, so there is never a delete without its audit
    /// entry.
    pub async fn soft_delete_with_audit(
        pool: &PgPool,
        id: Uuid,
        admin_email: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        AuditLog::create(
            &mut *tx,
            CreateAuditLog {
                action: format!("Deleted task {}", id),
                admin_email: admin_email.to_string(),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Lists every live task with owner email and share fan-out (admin view)
    pub async fn list_all_with_shares(pool: &PgPool) -> Result<Vec<TaskWithShares>, sqlx::Error> {
        let rows = sqlx::query_as::<_, FanOutRow>(
            r#"
            SELECT t.id, t.title, t.priority, t.completed,
                   owner.email AS owner_email,
                   grantee.email AS shared_email,
                   s.permission AS shared_permission
            FROM tasks t
            JOIN users owner ON owner.id = t.owner_id
            LEFT JOIN shares s ON s.task_id = t.id
            LEFT JOIN users grantee ON grantee.id = s.user_id
            WHERE t.deleted = FALSE
            ORDER BY t.created_at, t.id
            "#,
        )
        .fetch_all(pool)
        .await?;

        // One row per (task, grant); fold the grants into their task
        let mut tasks: Vec<TaskWithShares> = Vec::new();
        for row in rows {
            if tasks.last().map(|t| t.id) != Some(row.id) {
                tasks.push(TaskWithShares {
                    id: row.id,
                    title: row.title,
                    priority: row.priority,
                    completed: row.completed,
                    owner_email: row.owner_email,
                    shared_with: Vec::new(),
                });
            }

            if let (Some(email), Some(permission)) = (row.shared_email, row.shared_permission) {
                if let Some(task) = tasks.last_mut() {
                    task.shared_with.push(TaskGrant {
                        user_email: email,
                        permission,
                    });
                }
            }
        }

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_as_str() {
        assert_eq!(Priority::High.as_str(), "High");
        assert_eq!(Priority::Medium.as_str(), "Medium");
        assert_eq!(Priority::Low.as_str(), "Low");
    }

    #[test]
    fn test_priority_serde_wire_casing() {
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), "High");
        let p: Priority = serde_json::from_value(serde_json::json!("Low")).unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn test_task_with_shares_emails() {
        let view = TaskWithShares {
            id: Uuid::new_v4(),
            title: "Buy milk".to_string(),
            priority: Priority::Low,
            completed: false,
            owner_email: "a@x.com".to_string(),
            shared_with: vec![TaskGrant {
                user_email: "b@x.com".to_string(),
                permission: SharePermission::Editor,
            }],
        };

        let emails: Vec<&str> = view.emails().collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com"]);
    }
}
