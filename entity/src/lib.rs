pub mod prelude;

// Task board
pub mod columns;
pub mod todos;

// Slide decks
pub mod decks;

/// Integer id of the task-board tables (`SERIAL`).
pub type Id = i32;
