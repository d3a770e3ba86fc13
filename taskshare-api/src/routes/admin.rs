/// Admin endpoints
///
/// - `GET /admin/users` - Paginated list of every account
/// - `GET /admin/tasks` - Every live task with owner email and share fan-out
/// - `DELETE /admin/tasks/:task_id` - Force soft-delete with an audit record
///
/// Authentication happens in the shared middleware like any other protected
/// route; the admin role gate runs here, first thing in every handler, so a
/// non-admin gets 403 regardless of whether the resource exists.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskshare_shared::{
    auth::{access::require_admin, middleware::AuthContext},
    models::{
        task::{Task, TaskWithShares},
        user::{Role, User},
    },
};
use uuid::Uuid;

/// Pagination parameters for the user list
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    /// 1-based page number
    pub page: Option<i64>,

    /// Page size
    pub limit: Option<i64>,
}

/// Search parameters for the task list
#[derive(Debug, Deserialize)]
pub struct TaskSearchQuery {
    /// Exact email to filter by (case-insensitive); matches a task when the
    /// email is its owner's or any grantee's
    pub search: Option<String>,
}

/// A user as shown to admins; the password hash never leaves the store
#[derive(Debug, Serialize)]
pub struct AdminUserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for AdminUserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Paginated user list response
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<AdminUserView>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Computes the row offset for a page, saturating instead of overflowing
/// on absurd page numbers
fn page_offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// `GET /admin/users`
///
/// Page defaults to 1, limit to 10. Out-of-range pages return an empty list
/// rather than an error.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<Json<UserListResponse>> {
    require_admin(&auth)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let offset = page_offset(page, limit);

    let users = User::list(&state.db, limit, offset).await?;
    let total = User::count(&state.db).await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(AdminUserView::from).collect(),
        total,
        page,
        limit,
    }))
}

/// `GET /admin/tasks`
///
/// Lists every live task with its owner email and all grants. With
/// `?search=email`, keeps only tasks where that email (compared
/// case-insensitively, exact match) is the owner or a grantee.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<TaskSearchQuery>,
) -> ApiResult<Json<Vec<TaskWithShares>>> {
    require_admin(&auth)?;

    let mut tasks = Task::list_all_with_shares(&state.db).await?;

    if let Some(search) = query.search.as_deref() {
        let needle = search.to_lowercase();
        tasks.retain(|task| task.emails().any(|email| email.to_lowercase() == needle));
    }

    Ok(Json(tasks))
}

/// `DELETE /admin/tasks/:task_id`
///
/// Force soft-delete of any task, bypassing ownership. The delete and its
/// audit record commit atomically; a failed audit insert rolls the delete
/// back.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    require_admin(&auth)?;

    let admin = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if !Task::soft_delete_with_audit(&state.db, task_id, &admin.email).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(%task_id, admin = %admin.email, "task force-deleted by admin");

    Ok(Json(json!({ "status": "deleted" })))
}
