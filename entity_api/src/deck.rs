use super::error::{EntityApiErrorKind, Error};
use entity::decks::{ActiveModel, Column, Entity, Model};
use log::*;
use sea_orm::{
    entity::prelude::*,
    sea_query::{Expr, OnConflict},
    ActiveValue::Set,
    ConnectionTrait, DbBackend, QueryOrder, Statement,
};
use serde_json::Value as JsonValue;

/// Upsert that derives the stored version from the previous row in the same
/// statement: 1 for a new deck, otherwise the stored version (or 0) plus one.
pub const UPSERT_NEXT_VERSION_SQL: &str = r#"INSERT INTO "decks" ("id", "title", "content")
VALUES ($1, $2, jsonb_set($3::jsonb, '{version}', '1'::jsonb))
ON CONFLICT ("id") DO UPDATE SET
    "title" = EXCLUDED."title",
    "content" = jsonb_set(
        EXCLUDED."content",
        '{version}',
        to_jsonb(COALESCE(("decks"."content"->>'version')::int, 0) + 1)
    ),
    "updated_at" = NOW()
RETURNING "id", "title", "content", "created_at", "updated_at""#;

pub async fn find_by_id(db: &impl ConnectionTrait, id: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find_by_id(id.to_owned()).one(db).await?)
}

/// Inserts or replaces a deck. A `version` present in `content` is stored
/// as given; otherwise it is computed by the database.
pub async fn upsert(
    db: &impl ConnectionTrait,
    id: &str,
    title: &str,
    content: JsonValue,
) -> Result<Model, Error> {
    let has_version = content.get("version").is_some_and(|v| !v.is_null());

    if has_version {
        debug!("Upserting deck {id} with client-supplied version");
        upsert_as_is(db, id, title, content).await
    } else {
        debug!("Upserting deck {id} with next version");
        upsert_next_version(db, id, title, content).await
    }
}

async fn upsert_as_is(
    db: &impl ConnectionTrait,
    id: &str,
    title: &str,
    content: JsonValue,
) -> Result<Model, Error> {
    let active_model = ActiveModel {
        id: Set(id.to_owned()),
        title: Set(title.to_owned()),
        content: Set(content),
        ..Default::default()
    };

    Ok(Entity::insert(active_model)
        .on_conflict(
            OnConflict::column(Column::Id)
                .update_columns([Column::Title, Column::Content])
                .value(Column::UpdatedAt, Expr::current_timestamp())
                .to_owned(),
        )
        .exec_with_returning(db)
        .await?)
}

async fn upsert_next_version(
    db: &impl ConnectionTrait,
    id: &str,
    title: &str,
    content: JsonValue,
) -> Result<Model, Error> {
    Entity::find()
        .from_raw_sql(Statement::from_sql_and_values(
            DbBackend::Postgres,
            UPSERT_NEXT_VERSION_SQL,
            [id.into(), title.into(), content.into()],
        ))
        .one(db)
        .await?
        .ok_or(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotUpdated,
        })
}

/// All decks, most recently updated first.
pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_desc(Column::UpdatedAt)
        .all(db)
        .await?)
}

/// Round-trips `SELECT 1`.
pub async fn ping(db: &impl ConnectionTrait) -> Result<(), Error> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "SELECT 1",
    ))
    .await?;
    Ok(())
}
