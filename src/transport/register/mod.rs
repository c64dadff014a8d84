//! Model registration transport types.

mod response;

pub use response::{RegisterModelResponse, MODEL_ID_FIELD, STATUS_FIELD, TASK_ID_FIELD};
