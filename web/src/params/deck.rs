use domain::deck::DEFAULT_TITLE;
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct HomeParams {
    /// Deck to open in the editor. Without it the deck listing is served.
    pub deck: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub slides: Vec<Value>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_owned()
}
