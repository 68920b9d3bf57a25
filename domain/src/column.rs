use crate::board::notify_updated;
use crate::columns::Model;
use crate::error::Error;
use crate::Id;
use entity_api::column;
use events::EventPublisher;
use sea_orm::DatabaseConnection;

pub async fn add_column(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    owner: &str,
    name: &str,
) -> Result<Model, Error> {
    let column = column::create(db, owner, name).await?;
    notify_updated(event_publisher, owner).await;
    Ok(column)
}

/// Removes the column and its todos.
pub async fn delete_column(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    owner: &str,
    id: Id,
) -> Result<(), Error> {
    column::delete_with_todos(db, id, owner).await?;
    notify_updated(event_publisher, owner).await;
    Ok(())
}

/// The new name is trimmed and must not be empty.
pub async fn rename_column(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    owner: &str,
    id: Id,
    name: &str,
) -> Result<Model, Error> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid("name required"));
    }

    let column = column::rename(db, id, owner, name).await?;
    notify_updated(event_publisher, owner).await;
    Ok(column)
}

pub async fn duplicate_column(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    owner: &str,
    id: Id,
) -> Result<Model, Error> {
    let copy = column::duplicate(db, id, owner).await?;
    notify_updated(event_publisher, owner).await;
    Ok(copy)
}
