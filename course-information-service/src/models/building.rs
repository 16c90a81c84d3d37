use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A campus building that hosts class meetings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    #[schema(example = "1023")]
    pub number: String,
    #[schema(example = "Boyd Research and Education Center")]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}
