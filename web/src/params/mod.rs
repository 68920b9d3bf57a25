pub(crate) mod column;
pub(crate) mod deck;
pub(crate) mod todo;
