use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl Error {
    pub(crate) fn not_found() -> Self {
        Self(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::NotFound,
            )),
        })
    }

    /// A 500 carrying `source` for the log.
    pub(crate) fn internal<E>(source: E, context: &str) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self(DomainError {
            source: Some(Box::new(source)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Other(context.to_owned()),
            )),
        })
    }

    pub(crate) fn unprocessable() -> Self {
        Self(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Invalid,
            )),
        })
    }
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{}", self.0)
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0.error_kind {
            DomainErrorKind::Invalid(message) => (StatusCode::BAD_REQUEST, message.clone()),
            DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)) => {
                match entity_error_kind {
                    EntityErrorKind::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
                    EntityErrorKind::Invalid => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "unprocessable entity".to_string(),
                    ),
                    EntityErrorKind::Unauthenticated => {
                        (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
                    }
                    EntityErrorKind::DbTransaction | EntityErrorKind::Other(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    ),
                }
            }
            DomainErrorKind::Internal(InternalErrorKind::Serialization) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            error!("{}", self.0);
        } else {
            debug!("Responding {status}: {}", self.0);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
