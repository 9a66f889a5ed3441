pub mod database;
pub mod memory_store;
pub mod mongo_store;
pub mod store;

pub use database::{MongoDb, TODOS_COLLECTION};
pub use memory_store::{InMemoryTodoStore, InjectedFailure, StoreOperation};
pub use mongo_store::MongoTodoStore;
pub use store::{StoreError, TodoStore};
