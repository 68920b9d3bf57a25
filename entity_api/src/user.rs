//! Username-only session identity.
//!
//! There are no stored user records: whoever logs in with a non-empty name
//! becomes that principal, and every row they create is tagged with it.

use super::error::Error;
use async_trait::async_trait;
use axum_login::{AuthUser, AuthnBackend, UserId};
use log::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
}

impl AuthUser for Principal {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.username.clone()
    }

    fn session_auth_hash(&self) -> &[u8] {
        self.username.as_bytes()
    }
}

#[derive(Debug, Clone, ToSchema, Deserialize)]
#[schema(as = entity_api::user::Credentials)] // OpenAPI schema
pub struct Credentials {
    pub username: String,
}

#[derive(Debug, Clone, Default)]
pub struct Backend;

impl Backend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthnBackend for Backend {
    type User = Principal;
    type Credentials = Credentials;
    type Error = Error;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let username = creds.username.trim();
        if username.is_empty() {
            debug!("Rejecting login with an empty username");
            return Ok(None);
        }

        Ok(Some(Principal {
            username: username.to_owned(),
        }))
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        Ok(Some(Principal {
            username: user_id.clone(),
        }))
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;
