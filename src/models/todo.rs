use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::user::UserPublic;

/// A to-do item as stored in the database.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Todo {
    /// Unique identifier for the item (UUID v4).
    pub id: Uuid,
    /// The text of the to-do item.
    pub task: String,
    /// Whether the item has been checked off.
    pub completed: bool,
    /// Timestamp of when the item was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update; null until the item is first updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// Identifier of the user who owns the item.
    pub user_id: i32,
}

/// Input structure for creating a to-do item.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoCreate {
    /// The text of the item. Must be between 1 and 500 characters.
    #[validate(length(min = 1, max = 500))]
    pub task: String,

    /// Whether the item starts checked off. Defaults to false when omitted.
    #[serde(default)]
    pub completed: bool,
}

/// Input structure for updating a to-do item.
///
/// Both fields are optional; an absent field keeps its stored value.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoUpdate {
    #[validate(length(min = 1, max = 500))]
    pub task: Option<String>,

    pub completed: Option<bool>,
}

/// The client-visible shape of a to-do item, with the owner embedded as its
/// public projection.
#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub task: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: UserPublic,
}

impl TodoResponse {
    pub fn new(todo: Todo, owner: UserPublic) -> Self {
        Self {
            id: todo.id,
            task: todo.task,
            completed: todo.completed,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
            owner,
        }
    }
}
