/// Access-control resolution for tasks
///
/// Every task-touching operation asks the same question: what may this user
/// do with this task? The answer is a closed, ordered permission level
/// rather than ad hoc string checks scattered across handlers:
///
/// ```text
/// Owner > Editor > Viewer
/// ```
///
/// Resolution is O(1): one live-task lookup plus at most one share lookup.
/// A soft-deleted or absent task resolves to [`AccessError::NotFound`] for
/// everyone, including its owner; a live task with no ownership and no share
/// resolves to [`AccessError::Forbidden`].
///
/// # Example
///
/// ```no_run
/// use taskshare_shared::auth::access::{resolve_permission, Permission};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, task_id: Uuid, user_id: Uuid) -> anyhow::Result<()> {
/// let permission = resolve_permission(&pool, task_id, user_id).await?;
/// if permission.can_edit() {
///     // owner or editor
/// }
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::share::{Share, SharePermission};
use crate::models::task::Task;

/// Error type for access-control checks
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Task absent or soft-deleted
    #[error("Task not found")]
    NotFound,

    /// Authenticated but no relation to the task at all
    #[error("No access to this task")]
    Forbidden,

    /// Authenticated but not an admin
    #[error("Admin access required")]
    AdminRequired,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Permission level of a user on a task
///
/// Ordered: `Viewer < Editor < Owner`. "None" is not a variant; the absence
/// of any relation is [`AccessError::Forbidden`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Permission {
    /// Read-only access via a share
    Viewer,

    /// May update the task via a share
    Editor,

    /// Full control: update, delete, share
    Owner,
}

impl Permission {
    /// Converts permission to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Viewer => "viewer",
            Permission::Editor => "editor",
            Permission::Owner => "owner",
        }
    }

    /// Whether this level allows updating the task
    pub fn can_edit(&self) -> bool {
        matches!(self, Permission::Owner | Permission::Editor)
    }

    /// Whether this level allows deleting or sharing the task
    pub fn is_owner(&self) -> bool {
        matches!(self, Permission::Owner)
    }
}

impl From<SharePermission> for Permission {
    fn from(permission: SharePermission) -> Self {
        match permission {
            SharePermission::Viewer => Permission::Viewer,
            SharePermission::Editor => Permission::Editor,
        }
    }
}

/// Resolves the permission a user holds on a task
///
/// 1. Live-task lookup; absent or soft-deleted → [`AccessError::NotFound`]
/// 2. Ownership check → [`Permission::Owner`]
/// 3. Share lookup → the granted level, else [`AccessError::Forbidden`]
pub async fn resolve_permission(
    pool: &PgPool,
    task_id: Uuid,
    user_id: Uuid,
) -> Result<Permission, AccessError> {
    let task = Task::find_active(pool, task_id)
        .await?
        .ok_or(AccessError::NotFound)?;

    if task.owner_id == user_id {
        return Ok(Permission::Owner);
    }

    let share = Share::find(pool, task_id, user_id)
        .await?
        .ok_or(AccessError::Forbidden)?;

    Ok(share.permission.into())
}

/// Requires the authenticated identity to carry the admin role
pub fn require_admin(auth: &AuthContext) -> Result<&AuthContext, AccessError> {
    if !auth.role.is_admin() {
        return Err(AccessError::AdminRequired);
    }

    Ok(auth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    #[test]
    fn test_permission_ordering() {
        assert!(Permission::Viewer < Permission::Editor);
        assert!(Permission::Editor < Permission::Owner);
        assert!(Permission::Owner > Permission::Viewer);
    }

    #[test]
    fn test_can_edit() {
        assert!(Permission::Owner.can_edit());
        assert!(Permission::Editor.can_edit());
        assert!(!Permission::Viewer.can_edit());
    }

    #[test]
    fn test_is_owner() {
        assert!(Permission::Owner.is_owner());
        assert!(!Permission::Editor.is_owner());
        assert!(!Permission::Viewer.is_owner());
    }

    #[test]
    fn test_share_permission_conversion() {
        assert_eq!(Permission::from(SharePermission::Viewer), Permission::Viewer);
        assert_eq!(Permission::from(SharePermission::Editor), Permission::Editor);
    }

    #[test]
    fn test_require_admin() {
        let admin = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(require_admin(&admin).is_ok());

        let user = AuthContext {
            user_id: Uuid::new_v4(),
            role: Role::User,
        };
        assert!(matches!(
            require_admin(&user),
            Err(AccessError::AdminRequired)
        ));
    }
}
