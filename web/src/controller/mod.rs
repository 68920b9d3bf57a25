pub(crate) mod board_controller;
pub(crate) mod column_controller;
pub(crate) mod deck_controller;
pub(crate) mod health_check_controller;
pub(crate) mod todo_controller;
pub(crate) mod user_session_controller;

use axum::Json;
use serde_json::{json, Value};

/// `{"status": <status>}`, the body of every task-board write.
pub(crate) fn status(status: &str) -> Json<Value> {
    Json(json!({ "status": status }))
}
