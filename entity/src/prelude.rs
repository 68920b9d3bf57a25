pub use super::columns::Entity as Columns;
pub use super::decks::Entity as Decks;
pub use super::todos::Entity as Todos;
