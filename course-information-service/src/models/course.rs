use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog course, independent of any term's sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[schema(example = "CSCI-1302")]
    pub course_id: String,
    /// Major code, e.g. `CSCI`.
    #[schema(example = "CSCI")]
    pub subject: String,
    #[schema(example = "1302")]
    pub course_number: String,
    #[schema(example = "Software Development")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Title as shown in Athena.
    #[schema(example = "SOFTWARE DEVELOPMENT")]
    pub athena_name: String,
    #[schema(example = 4)]
    pub credit_hours: u8,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub terms: Vec<String>,
    /// Requirement names this course fulfils.
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub corequisites: Vec<String>,
}

impl Course {
    /// Thousands band of the course number: `4730` is level `4000`.
    pub fn class_level(&self) -> Option<u16> {
        self.course_number
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .map(|d| d as u16 * 1000)
    }
}
