use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Todo, TodoCreate, TodoResponse, TodoUpdate, UserPublic},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TODO_COLUMNS: &str = "id, task, completed, created_at, updated_at, user_id";

/// Retrieves all to-do items owned by the authenticated user.
///
/// Items are ordered by creation date in descending order. Nobody else's
/// items can appear here: the query is scoped to the caller's user id.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of to-do items.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `500 Internal Server Error`: For database errors.
#[get("")]
pub async fn get_todos(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = sqlx::query_as::<_, Todo>(&format!(
        "SELECT {} FROM todos WHERE user_id = $1 ORDER BY created_at DESC",
        TODO_COLUMNS
    ))
    .bind(user.0.id)
    .fetch_all(&**pool)
    .await?;

    let owner = UserPublic::from(user.0);
    let body: Vec<TodoResponse> = todos
        .into_iter()
        .map(|todo| TodoResponse::new(todo, owner.clone()))
        .collect();

    Ok(HttpResponse::Ok().json(body))
}

/// Creates a new to-do item for the authenticated user.
///
/// ## Request Body:
/// - `task`: The text of the item (required, 1-500 characters).
/// - `completed` (optional): Initial checked-off state, defaults to false.
///
/// ## Responses:
/// - `201 Created`: Returns the newly created item.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `422 Unprocessable Entity`: If input validation fails.
/// - `500 Internal Server Error`: For database errors.
#[post("")]
pub async fn create_todo(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    todo_data: web::Json<TodoCreate>,
) -> Result<impl Responder, AppError> {
    // Validate input
    todo_data.validate()?;

    let todo = sqlx::query_as::<_, Todo>(&format!(
        "INSERT INTO todos (id, task, completed, user_id) VALUES ($1, $2, $3, $4)
         RETURNING {}",
        TODO_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&todo_data.task)
    .bind(todo_data.completed)
    .bind(user.0.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(TodoResponse::new(todo, UserPublic::from(user.0))))
}

/// Retrieves a single to-do item by its ID.
///
/// The lookup is scoped to the caller: an id owned by another user and an id
/// that does not exist produce the same `404 Not Found`.
///
/// ## Responses:
/// - `200 OK`: Returns the item.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `404 Not Found`: If the id does not resolve within the caller's items.
/// - `500 Internal Server Error`: For database errors.
#[get("/{id}")]
pub async fn get_todo(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let todo = sqlx::query_as::<_, Todo>(&format!(
        "SELECT {} FROM todos WHERE id = $1 AND user_id = $2",
        TODO_COLUMNS
    ))
    .bind(todo_id.into_inner())
    .bind(user.0.id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;

    Ok(HttpResponse::Ok().json(TodoResponse::new(todo, UserPublic::from(user.0))))
}

/// Updates a to-do item owned by the authenticated user.
///
/// This is a partial update: an absent field keeps its stored value. The
/// `updated_at` timestamp is bumped by the database on every successful
/// update.
///
/// ## Request Body:
/// - `task` (optional): Replacement text, 1-500 characters.
/// - `completed` (optional): Replacement checked-off state.
///
/// ## Responses:
/// - `200 OK`: Returns the updated item.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `404 Not Found`: If the id does not resolve within the caller's items.
/// - `422 Unprocessable Entity`: If input validation fails.
/// - `500 Internal Server Error`: For database errors.
#[put("/{id}")]
pub async fn update_todo(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    todo_id: web::Path<Uuid>,
    todo_data: web::Json<TodoUpdate>,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;
    let todo_uuid = todo_id.into_inner();

    // Fetch the current row, scoped to the caller, then merge in the
    // submitted fields.
    let existing = sqlx::query_as::<_, Todo>(&format!(
        "SELECT {} FROM todos WHERE id = $1 AND user_id = $2",
        TODO_COLUMNS
    ))
    .bind(todo_uuid)
    .bind(user.0.id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;

    let todo_input = todo_data.into_inner();
    let task = todo_input.task.unwrap_or(existing.task);
    let completed = todo_input.completed.unwrap_or(existing.completed);

    let todo = sqlx::query_as::<_, Todo>(&format!(
        "UPDATE todos SET task = $1, completed = $2, updated_at = NOW()
         WHERE id = $3 AND user_id = $4
         RETURNING {}",
        TODO_COLUMNS
    ))
    .bind(task)
    .bind(completed)
    .bind(todo_uuid)
    .bind(user.0.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(TodoResponse::new(todo, UserPublic::from(user.0))))
}

/// Deletes a to-do item owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: `{"ok": true}` on successful deletion.
/// - `401 Unauthorized`: If the request lacks a valid bearer token.
/// - `404 Not Found`: If the id does not resolve within the caller's items.
/// - `500 Internal Server Error`: For database errors.
#[delete("/{id}")]
pub async fn delete_todo(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    todo_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
        .bind(todo_id.into_inner())
        .bind(user.0.id)
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Todo not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
