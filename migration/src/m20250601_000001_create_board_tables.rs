use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS columns (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                owner TEXT NOT NULL
            )",
        )
        .await?;

        // Deleting a column also removes its todos at the database level.
        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS todos (
                id SERIAL PRIMARY KEY,
                task TEXT NOT NULL,
                owner TEXT NOT NULL,
                column_id INTEGER NOT NULL,
                position INTEGER NOT NULL DEFAULT 1,
                CONSTRAINT fk_todos_column
                    FOREIGN KEY (column_id)
                    REFERENCES columns(id)
                    ON DELETE CASCADE
            )",
        )
        .await?;

        db.execute_unprepared("CREATE INDEX IF NOT EXISTS columns_owner_idx ON columns(owner)")
            .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS todos_owner_column_position_idx
            ON todos(owner, column_id, position)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS todos").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS columns").await?;
        Ok(())
    }
}
