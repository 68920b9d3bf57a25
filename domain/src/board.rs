use crate::error::Error;
use crate::Id;
use entity_api::{column, todo};
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BoardColumn {
    pub id: Id,
    pub name: String,
    pub tasks: Vec<BoardTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BoardTask {
    pub id: Id,
    pub task: String,
    pub position: i32,
}

/// The owner's columns by id, each with its tasks by position.
pub async fn get_board(db: &DatabaseConnection, owner: &str) -> Result<Vec<BoardColumn>, Error> {
    let columns = column::find_by_owner(db, owner).await?;
    let todos = todo::find_by_owner_in_position_order(db, owner).await?;

    let mut board: Vec<BoardColumn> = columns
        .into_iter()
        .map(|column| BoardColumn {
            id: column.id,
            name: column.name,
            tasks: Vec::new(),
        })
        .collect();

    for todo in todos {
        if let Some(column) = board.iter_mut().find(|c| c.id == todo.column_id) {
            column.tasks.push(BoardTask {
                id: todo.id,
                task: todo.task,
                position: todo.position,
            });
        }
    }

    Ok(board)
}

/// Tells every open `/events` stream to re-fetch.
pub(crate) async fn notify_updated(event_publisher: &EventPublisher, owner: &str) {
    event_publisher
        .publish(DomainEvent::BoardUpdated {
            owner: owner.to_owned(),
        })
        .await;
}
