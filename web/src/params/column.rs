use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateParams {
    pub name: String,
}

/// A missing name is treated as empty and rejected by the rename rule.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct RenameParams {
    #[serde(default)]
    pub name: String,
}
