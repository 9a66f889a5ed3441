pub mod json_payload;
pub mod todo_id;

pub use json_payload::JsonPayload;
pub use todo_id::TodoId;
