//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use sea_orm::error::DbErr;

/// Errors while executing operations related to entities.
/// The intent is to categorize errors into two major types:
///  * Errors related to data. Ex DbError::RecordNotFound
///  * Errors related to interactions with the database itself. Ex DbError::Conn
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying error emitted from seaORM internals
    pub source: Option<DbErr>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // Record not found, or owned by somebody else
    RecordNotFound,
    // Record not inserted or updated
    RecordNotUpdated,
    // Credentials rejected by the auth backend
    RecordUnauthenticated,
    // Errors related to interactions with the database itself. Ex DbError::Conn
    SystemError,
    // Validation error
    ValidationError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Entity API Error: {:?}: {}", self.error_kind, source),
            None => write!(f, "Entity API Error: {:?}", self.error_kind),
        }
    }
}

impl StdError for Error {}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        let error_kind = match err {
            DbErr::RecordNotFound(_) => EntityApiErrorKind::RecordNotFound,
            DbErr::RecordNotUpdated | DbErr::RecordNotInserted => {
                EntityApiErrorKind::RecordNotUpdated
            }
            _ => EntityApiErrorKind::SystemError,
        };
        Error {
            source: Some(err),
            error_kind,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn db_errors_are_categorized() {
        let not_found: Error = DbErr::RecordNotFound("columns".to_string()).into();
        assert_eq!(not_found.error_kind, EntityApiErrorKind::RecordNotFound);

        let conn: Error = DbErr::Custom("connection reset".to_string()).into();
        assert_eq!(conn.error_kind, EntityApiErrorKind::SystemError);
        assert!(conn.to_string().contains("connection reset"));
    }
}
