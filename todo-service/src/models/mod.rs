pub mod todo;

pub use todo::{now_millis, Todo, TodoInput};
