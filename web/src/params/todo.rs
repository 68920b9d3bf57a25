use domain::Id;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct TaskParams {
    pub task: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct MoveParams {
    pub task_id: Id,
    pub to_column_id: Id,
    pub new_position: i32,
}
