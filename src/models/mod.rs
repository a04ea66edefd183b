pub mod todo;
pub mod user;

pub use todo::{Todo, TodoCreate, TodoResponse, TodoUpdate};
pub use user::{User, UserPublic};
