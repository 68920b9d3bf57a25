use super::column::{self, DEFAULT_COLUMN_NAME};
use super::error::Error;
use super::not_found;
use entity::todos::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{NotSet, Set, Unchanged},
    ConnectionTrait, QueryOrder, TransactionTrait,
};

/// Appends a task to the owner's first column, creating the default column
/// when the owner has none. Runs in one transaction.
pub async fn add_task(db: &impl TransactionTrait, owner: &str, task: &str) -> Result<Model, Error> {
    let txn = db.begin().await?;

    let target = match column::find_first_by_owner(&txn, owner).await? {
        Some(existing) => existing,
        None => column::create(&txn, owner, DEFAULT_COLUMN_NAME).await?,
    };
    let position = next_position(&txn, target.id, owner).await?;

    let todo = create(&txn, owner, task, target.id, position).await?;

    txn.commit().await?;

    debug!(
        "Added todo {} to column {} at position {position}",
        todo.id, target.id
    );
    Ok(todo)
}

pub async fn create(
    db: &impl ConnectionTrait,
    owner: &str,
    task: &str,
    column_id: Id,
    position: i32,
) -> Result<Model, Error> {
    let active_model = ActiveModel {
        id: NotSet,
        task: Set(task.to_owned()),
        owner: Set(owner.to_owned()),
        column_id: Set(column_id),
        position: Set(position),
    };

    Ok(active_model.insert(db).await?)
}

/// `MAX(position) + 1` within the owner's column, starting at 1.
pub async fn next_position(
    db: &impl ConnectionTrait,
    column_id: Id,
    owner: &str,
) -> Result<i32, Error> {
    let last = Entity::find()
        .filter(Column::ColumnId.eq(column_id))
        .filter(Column::Owner.eq(owner))
        .order_by_desc(Column::Position)
        .one(db)
        .await?;

    Ok(last.map_or(1, |todo| todo.position + 1))
}

/// The owner's todos in insertion order.
pub async fn find_by_owner(db: &impl ConnectionTrait, owner: &str) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Owner.eq(owner))
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// The owner's todos in board order: by position, ties by id.
pub async fn find_by_owner_in_position_order(
    db: &impl ConnectionTrait,
    owner: &str,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Owner.eq(owner))
        .order_by_asc(Column::Position)
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

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

pub async fn update_task(
    db: &impl ConnectionTrait,
    id: Id,
    owner: &str,
    task: &str,
) -> Result<Model, Error> {
    let existing = find_by_id_and_owner(db, id, owner).await?;
    debug!("Updating todo {id} for {owner}");

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        task: Set(task.to_owned()),
        owner: Unchanged(existing.owner),
        column_id: Unchanged(existing.column_id),
        position: Unchanged(existing.position),
    };

    Ok(active_model.update(db).await?)
}

pub async fn delete(db: &impl ConnectionTrait, id: Id, owner: &str) -> Result<(), Error> {
    let result = Entity::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::Owner.eq(owner))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        debug!("Todo {id} not found for {owner}");
        return Err(not_found());
    }
    Ok(())
}

/// Moves a todo into `to_column_id` at `new_position`. Both the todo and the
/// target column must belong to `owner`. Positions of neighbours are left alone.
pub async fn move_task(
    db: &impl ConnectionTrait,
    id: Id,
    owner: &str,
    to_column_id: Id,
    new_position: i32,
) -> Result<Model, Error> {
    let existing = find_by_id_and_owner(db, id, owner).await?;
    let target = column::find_by_id_and_owner(db, to_column_id, owner).await?;
    debug!(
        "Moving todo {id} from column {} to column {} at position {new_position}",
        existing.column_id, target.id
    );

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        task: Unchanged(existing.task),
        owner: Unchanged(existing.owner),
        column_id: Set(target.id),
        position: Set(new_position),
    };

    Ok(active_model.update(db).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use entity::columns;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn todo(id: Id, task: &str, column_id: Id, position: i32) -> Model {
        Model {
            id,
            task: task.to_owned(),
            owner: "alice".to_owned(),
            column_id,
            position,
        }
    }

    fn column(id: Id, name: &str) -> columns::Model {
        columns::Model {
            id,
            name: name.to_owned(),
            owner: "alice".to_owned(),
        }
    }

    #[tokio::test]
    async fn add_task_creates_the_default_column_when_none_exists() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<columns::Model>::new()])
            .append_query_results([vec![column(1, DEFAULT_COLUMN_NAME)]])
            .append_query_results([Vec::<Model>::new()])
            .append_query_results([vec![todo(1, "buy milk", 1, 1)]])
            .into_connection();

        let created = add_task(&db, "alice", "buy milk").await?;

        assert_eq!(created.column_id, 1);
        assert_eq!(created.position, 1);

        let log = format!("{:?}", db.into_transaction_log());
        assert_eq!(log.matches(r#"INSERT INTO \"columns\""#).count(), 1);
        assert!(log.contains(DEFAULT_COLUMN_NAME));
        Ok(())
    }

    #[tokio::test]
    async fn add_task_appends_to_the_existing_first_column() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![column(4, "Backlog")]])
            .append_query_results([vec![todo(10, "older", 4, 3)]])
            .append_query_results([vec![todo(11, "newer", 4, 4)]])
            .into_connection();

        let created = add_task(&db, "alice", "newer").await?;

        assert_eq!(created.position, 4);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains(r#"INSERT INTO \"columns\""#));
        Ok(())
    }

    #[tokio::test]
    async fn next_position_starts_at_one() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        assert_eq!(next_position(&db, 1, "alice").await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_task_returns_not_found_for_another_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let result = update_task(&db, 1, "mallory", "stolen").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn delete_returns_not_found_when_nothing_was_deleted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete(&db, 1, "mallory").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn move_task_rejects_a_target_column_owned_by_someone_else() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![todo(1, "task", 1, 1)]])
            .append_query_results([Vec::<columns::Model>::new()])
            .into_connection();

        let result = move_task(&db, 1, "alice", 99, 0).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn move_task_sets_column_and_position() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![todo(1, "task", 1, 1)]])
            .append_query_results([vec![column(2, "Done")]])
            .append_query_results([vec![todo(1, "task", 2, 7)]])
            .into_connection();

        let moved = move_task(&db, 1, "alice", 2, 7).await?;

        assert_eq!((moved.column_id, moved.position), (2, 7));
        Ok(())
    }
}
