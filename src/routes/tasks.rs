use crate::{
    auth::{ensure_task_owner, AuthenticatedUserId},
    error::AppError,
    models::{response::MessageResponse, ApiResponse, NewTask, Task, TaskUpdate},
    store::TaskRepository,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Loads a task and checks that the caller owns it.
async fn owned_task(
    tasks: &dyn TaskRepository,
    id: Uuid,
    user: AuthenticatedUserId,
    action: &str,
) -> Result<Task, AppError> {
    let task = tasks
        .find_task(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    ensure_task_owner(task.user_id, user.0, action)?;
    Ok(task)
}

/// Lists the authenticated user's tasks, newest first.
///
/// ## Responses:
/// - `200 OK`: `{status: "success", data: [Task]}`.
/// - `401 Unauthorized`: no valid bearer token.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<dyn TaskRepository>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let owned = tasks.list_tasks(user.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(owned)))
}

/// Creates a task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required, at most 200 characters.
/// - `description` (optional): at most 1000 characters.
/// - `status` (optional): `"PENDING"` (default) or `"COMPLETED"`.
///
/// ## Responses:
/// - `201 Created`: `{status: "success", data: Task}`.
/// - `400 Bad Request`: missing title or invalid fields.
#[post("")]
pub async fn create_task(
    tasks: web::Data<dyn TaskRepository>,
    user: AuthenticatedUserId,
    body: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    let input = body.into_inner();
    input.validate()?;

    let title = match input.title {
        Some(title) if !title.is_empty() => title,
        _ => return Err(AppError::MissingFields("Please provide a title".into())),
    };

    let task = Task::new(
        title,
        input.description,
        input.status.unwrap_or_default(),
        user.0,
    );
    let created = tasks.insert_task(task).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

/// Fetches one task.
///
/// ## Responses:
/// - `200 OK`: `{status: "success", data: Task}`.
/// - `403 Forbidden`: the task belongs to someone else.
/// - `404 Not Found`: no such task.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<dyn TaskRepository>,
    user: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = owned_task(tasks.get_ref(), task_id.into_inner(), user, "view").await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(task)))
}

/// Partially updates a task. Absent fields keep their value.
///
/// ## Responses:
/// - `200 OK`: `{status: "success", data: Task}`.
/// - `400 Bad Request`: invalid fields.
/// - `403 Forbidden`: `"Not authorized to update this task"`.
/// - `404 Not Found`: no such task.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<dyn TaskRepository>,
    user: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
    body: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let update = body.into_inner();
    update.validate()?;

    let mut task = owned_task(tasks.get_ref(), task_id.into_inner(), user, "update").await?;
    task.apply(update);
    let updated = tasks.update_task(task).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: `{status: "success", message: "Task deleted"}`.
/// - `403 Forbidden`: `"Not authorized to delete this task"`.
/// - `404 Not Found`: no such task.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<dyn TaskRepository>,
    user: AuthenticatedUserId,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = owned_task(tasks.get_ref(), task_id.into_inner(), user, "delete").await?;

    if !tasks.delete_task(task.id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        status: "success".into(),
        message: "Task deleted".into(),
    }))
}
