use super::error::Error;
use super::not_found;
use entity::columns::{ActiveModel, Column, Entity, Model};
use entity::{todos, Id};
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{NotSet, Set, Unchanged},
    ConnectionTrait, QueryOrder, TransactionTrait,
};

/// Name given to the column created on a user's first task.
pub const DEFAULT_COLUMN_NAME: &str = "To Do";

pub async fn create(db: &impl ConnectionTrait, owner: &str, name: &str) -> Result<Model, Error> {
    debug!("Creating column {name:?} for {owner}");

    let active_model = ActiveModel {
        id: NotSet,
        name: Set(name.to_owned()),
        owner: Set(owner.to_owned()),
    };

    Ok(active_model.insert(db).await?)
}

/// The owner's columns, oldest first.
pub async fn find_by_owner(db: &impl ConnectionTrait, owner: &str) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Owner.eq(owner))
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// The owner's lowest-id column, if any.
pub async fn find_first_by_owner(
    db: &impl ConnectionTrait,
    owner: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Owner.eq(owner))
        .order_by_asc(Column::Id)
        .one(db)
        .await?)
}

/// Finds a column only when `owner` owns it; anything else is `RecordNotFound`.
pub async fn find_by_id_and_owner(
    db: &impl ConnectionTrait,
    id: Id,
    owner: &str,
) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .filter(Column::Owner.eq(owner))
        .one(db)
        .await?
        .ok_or_else(not_found)
}

pub async fn rename(
    db: &impl ConnectionTrait,
    id: Id,
    owner: &str,
    name: &str,
) -> Result<Model, Error> {
    let existing = find_by_id_and_owner(db, id, owner).await?;
    debug!("Renaming column {id} from {:?} to {name:?}", existing.name);

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        name: Set(name.to_owned()),
        owner: Unchanged(existing.owner),
    };

    Ok(active_model.update(db).await?)
}

/// Deletes the column and every todo in it in one transaction.
pub async fn delete_with_todos(db: &impl TransactionTrait, id: Id, owner: &str) -> Result<(), Error> {
    let txn = db.begin().await?;

    let column = find_by_id_and_owner(&txn, id, owner).await?;

    let deleted = todos::Entity::delete_many()
        .filter(todos::Column::ColumnId.eq(column.id))
        .exec(&txn)
        .await?;
    Entity::delete_by_id(column.id).exec(&txn).await?;

    txn.commit().await?;

    debug!(
        "Deleted column {id} and {} todo(s) for {owner}",
        deleted.rows_affected
    );
    Ok(())
}

/// Copies a column as `"<name> (copy)"` together with its todos, keeping
/// each todo's position.
pub async fn duplicate(db: &impl TransactionTrait, id: Id, owner: &str) -> Result<Model, Error> {
    let txn = db.begin().await?;

    let source = find_by_id_and_owner(&txn, id, owner).await?;
    let copy = create(&txn, owner, &format!("{} (copy)", source.name)).await?;

    let tasks = todos::Entity::find()
        .filter(todos::Column::ColumnId.eq(source.id))
        .filter(todos::Column::Owner.eq(owner))
        .order_by_asc(todos::Column::Position)
        .order_by_asc(todos::Column::Id)
        .all(&txn)
        .await?;

    if !tasks.is_empty() {
        let copies = tasks.into_iter().map(|todo| todos::ActiveModel {
            id: NotSet,
            task: Set(todo.task),
            owner: Set(todo.owner),
            column_id: Set(copy.id),
            position: Set(todo.position),
        });
        todos::Entity::insert_many(copies)
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    debug!("Duplicated column {id} into {} for {owner}", copy.id);
    Ok(copy)
}
