/// Task endpoints
///
/// - `GET /tasks` - Tasks visible to the user (owned + shared), with the
///   permission held on each
/// - `POST /tasks` - Create a task; the creator becomes the owner
/// - `PUT /tasks/:task_id` - Update (owner or editor)
/// - `DELETE /tasks/:task_id` - Soft delete (owner only)
/// - `POST /tasks/:task_id/share` - Grant viewer/editor access (owner only)
///
/// Every mutating endpoint goes through the access-control resolver; deleted
/// tasks are invisible here as if they never existed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskshare_shared::{
    auth::{access::resolve_permission, middleware::AuthContext},
    models::{
        share::{CreateShare, Share, SharePermission},
        task::{CreateTask, Priority, Task, UpdateTask},
        user::User,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub priority: Priority,
}

/// Update task request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub priority: Priority,

    pub completed: bool,
}

/// Share task request
#[derive(Debug, Deserialize, Validate)]
pub struct ShareTaskRequest {
    /// Email of the grantee
    #[validate(email(message = "Invalid email format"))]
    pub user_email: String,

    /// "viewer" or "editor"
    pub permission: String,
}

/// A task as seen by the requesting user
#[derive(Debug, Serialize)]
pub struct TaskView {
    pub id: Uuid,
    pub title: String,
    pub priority: Priority,
    pub completed: bool,

    /// Permission the requesting user holds: "owner", "editor", or "viewer"
    pub permission: &'static str,
}

impl TaskView {
    fn new(task: &Task, permission: &'static str) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            priority: task.priority,
            completed: task.completed,
            permission,
        }
    }
}

/// `GET /tasks`
///
/// Owned tasks first, then tasks shared with the user. Deleted tasks are
/// excluded from both.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let mut response = Vec::new();

    for task in Task::list_owned(&state.db, auth.user_id).await? {
        response.push(TaskView::new(&task, "owner"));
    }

    for shared in Task::list_shared_with(&state.db, auth.user_id).await? {
        let permission = shared.permission.as_str();
        response.push(TaskView::new(&shared.task, permission));
    }

    Ok(Json(response))
}

/// `POST /tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<TaskView>> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            priority: req.priority,
            owner_id: auth.user_id,
        },
    )
    .await?;

    Ok(Json(TaskView::new(&task, "owner")))
}

/// `PUT /tasks/:task_id`
///
/// # Errors
///
/// - `404 Not Found`: task absent or soft-deleted
/// - `403 Forbidden`: no relation, or viewer-only share
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskView>> {
    req.validate()?;

    let permission = resolve_permission(&state.db, task_id, auth.user_id).await?;
    if !permission.can_edit() {
        return Err(ApiError::Forbidden("Edit not allowed".to_string()));
    }

    let task = Task::update(
        &state.db,
        task_id,
        UpdateTask {
            title: req.title,
            priority: req.priority,
            completed: req.completed,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskView::new(&task, permission.as_str())))
}

/// `DELETE /tasks/:task_id`
///
/// Soft delete; the row is retained. Editors are explicitly insufficient.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let permission = resolve_permission(&state.db, task_id, auth.user_id).await?;
    if !permission.is_owner() {
        return Err(ApiError::Forbidden("Only the owner can delete".to_string()));
    }

    if !Task::soft_delete(&state.db, task_id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(json!({ "status": "deleted" })))
}

/// `POST /tasks/:task_id/share`
///
/// # Errors
///
/// - `400 Bad Request`: permission is neither "viewer" nor "editor"
/// - `403 Forbidden`: requester is not the owner
/// - `404 Not Found`: task deleted/absent, or grantee email unknown
/// - `409 Conflict`: task already shared with this user
pub async fn share_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<ShareTaskRequest>,
) -> ApiResult<Json<Value>> {
    req.validate()?;

    let permission = SharePermission::parse(&req.permission)
        .ok_or_else(|| ApiError::BadRequest("Invalid permission".to_string()))?;

    if !resolve_permission(&state.db, task_id, auth.user_id)
        .await?
        .is_owner()
    {
        return Err(ApiError::Forbidden("Only the owner can share".to_string()));
    }

    let grantee = User::find_by_email(&state.db, &req.user_email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    // Duplicate (task, grantee) pairs surface as a unique-constraint
    // violation and map to 409
    Share::create(
        &state.db,
        CreateShare {
            task_id,
            user_id: grantee.id,
            permission,
        },
    )
    .await?;

    Ok(Json(json!({ "success": true })))
}
