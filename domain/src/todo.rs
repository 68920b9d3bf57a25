use crate::board::notify_updated;
use crate::error::Error;
use crate::todos::Model;
use crate::Id;
use entity_api::todo;
use events::EventPublisher;
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

/// Row of the flat `/list` view, serialized as a positional `[id, task]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TaskSummary(pub Id, pub String);

pub async fn add_task(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    owner: &str,
    task: &str,
) -> Result<Model, Error> {
    let todo = todo::add_task(db, owner, task).await?;
    notify_updated(event_publisher, owner).await;
    Ok(todo)
}

pub async fn list_tasks(db: &DatabaseConnection, owner: &str) -> Result<Vec<TaskSummary>, Error> {
    Ok(todo::find_by_owner(db, owner)
        .await?
        .into_iter()
        .map(|todo| TaskSummary(todo.id, todo.task))
        .collect())
}

pub async fn edit_task(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    owner: &str,
    id: Id,
    task: &str,
) -> Result<Model, Error> {
    let todo = todo::update_task(db, id, owner, task).await?;
    notify_updated(event_publisher, owner).await;
    Ok(todo)
}

pub async fn delete_task(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    owner: &str,
    id: Id,
) -> Result<(), Error> {
    todo::delete(db, id, owner).await?;
    notify_updated(event_publisher, owner).await;
    Ok(())
}

/// No ordering validation: the client decides `new_position`.
pub async fn move_task(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    owner: &str,
    id: Id,
    to_column_id: Id,
    new_position: i32,
) -> Result<Model, Error> {
    let todo = todo::move_task(db, id, owner, to_column_id, new_position).await?;
    debug!("Moved todo {id} for {owner}");
    notify_updated(event_publisher, owner).await;
    Ok(todo)
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, EntityErrorKind, InternalErrorKind};
    use async_trait::async_trait;
    use events::{DomainEvent, EventHandler};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        owners: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &DomainEvent) {
            if let DomainEvent::BoardUpdated { owner } = event {
                self.owners.lock().unwrap().push(owner.clone());
            }
        }
    }

    #[tokio::test]
    async fn delete_task_publishes_a_board_update() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let recorder = Arc::new(Recorder::default());
        let publisher = EventPublisher::new().with_handler(recorder.clone());

        delete_task(&db, &publisher, "alice", 1).await?;

        assert_eq!(*recorder.owners.lock().unwrap(), vec!["alice"]);
        Ok(())
    }

    #[tokio::test]
    async fn failed_edits_publish_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();
        let recorder = Arc::new(Recorder::default());
        let publisher = EventPublisher::new().with_handler(recorder.clone());

        let err = edit_task(&db, &publisher, "mallory", 1, "x")
            .await
            .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
        assert!(recorder.owners.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_tasks_returns_id_and_text() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![Model {
                id: 1,
                task: "buy milk".to_owned(),
                owner: "alice".to_owned(),
                column_id: 1,
                position: 1,
            }]])
            .into_connection();

        let tasks = list_tasks(&db, "alice").await?;

        assert_eq!(
            tasks,
            vec![TaskSummary(1, "buy milk".to_owned())]
        );
        assert_eq!(
            serde_json::to_value(&tasks).unwrap(),
            serde_json::json!([[1, "buy milk"]])
        );
        Ok(())
    }
}
