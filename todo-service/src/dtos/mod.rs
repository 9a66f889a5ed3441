pub mod todos;

pub use todos::{DeleteTodoResponse, TodoResponse};
