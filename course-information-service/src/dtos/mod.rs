//! Query-string shapes for the catalog endpoints.
//!
//! Every field is optional at the serde level so that missing, blank and
//! malformed values all surface as the same 400 from the handlers. Query
//! strings serde cannot decode at all are rejected by `CatalogQuery`.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "professor is required")]
    pub error: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfessorParams {
    /// Name of the professor teaching the section
    pub professor: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MajorParams {
    /// Major code, e.g. CSCI
    pub major: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CrnParams {
    /// Course reference number of the section
    pub crn: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct AthenaNameParams {
    /// Course title as shown in Athena
    pub athena_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TermParams {
    /// Term such as "Fall 2025"
    pub term: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CourseIdParams {
    /// Course id such as "CSCI-1301"
    pub course_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CourseSearchParams {
    /// Required credit hours, 1 to 4
    pub credit_hours: Option<String>,
    /// Optional major code, e.g. CSCI
    pub major_code: Option<String>,
    /// Optional class level, e.g. 4000
    pub class_level: Option<String>,
}

/// A course named by id or by one of its sections; at least one is required.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CourseRefParams {
    pub course_id: Option<String>,
    pub crn: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct SectionSearchParams {
    /// Meeting window, e.g. "10:00 AM - 11:15 AM"
    pub time_slot: Option<String>,
    pub crn: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequirementParams {
    /// Requirement name, e.g. "Quantitative Reasoning"
    pub requirement: Option<String>,
}
