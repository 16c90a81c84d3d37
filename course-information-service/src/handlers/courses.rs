//! Catalog lookup handlers.
//!
//! Each handler validates its query parameters, makes exactly one catalog
//! call and maps the result: 200 with the payload, 400 for a missing or
//! invalid parameter, 404 when nothing matches, 500 when the catalog fails.

use axum::{extract::State, Json};
use service_core::error::AppError;
use std::str::FromStr;
use validator::Validate;

use crate::dtos::{
    AthenaNameParams, CourseIdParams, CourseRefParams, CourseSearchParams, CrnParams,
    MajorParams, ProfessorParams, RequirementParams, SectionSearchParams, TermParams,
};
use crate::extract::CatalogQuery;
use crate::models::{Building, Course, CourseSection, SpecialCourseType, TimeSlot};
use crate::services::{CatalogError, CourseFilter, CourseRef};
use crate::AppState;

fn bad_request(message: impl Into<String>) -> AppError {
    AppError::BadRequest(anyhow::anyhow!(message.into()))
}

/// Trimmed value, or `None` when absent or blank.
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    optional(value).ok_or_else(|| bad_request(format!("{} is required", name)))
}

fn optional_int<T: FromStr>(value: Option<String>, name: &str) -> Result<Option<T>, AppError> {
    optional(value)
        .map(|v| {
            v.parse()
                .map_err(|_| bad_request(format!("{} must be an integer", name)))
        })
        .transpose()
}

fn lookup_failed(operation: &'static str) -> impl FnOnce(CatalogError) -> AppError {
    move |e| {
        tracing::error!(operation, error = %e, "Catalog lookup failed");
        metrics::counter!("catalog_lookup_failures_total", "operation" => operation).increment(1);
        AppError::from(e)
    }
}

fn non_empty<T>(items: Vec<T>, message: &str) -> Result<Json<Vec<T>>, AppError> {
    if items.is_empty() {
        return Err(AppError::NotFound(anyhow::anyhow!(message.to_string())));
    }
    Ok(Json(items))
}

fn present<T>(item: Option<T>, message: &str) -> Result<Json<T>, AppError> {
    item.map(Json)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!(message.to_string())))
}

/// List course sections taught by a professor.
#[utoipa::path(
    get,
    path = "/api/courseInformation/professor",
    params(ProfessorParams),
    responses(
        (status = 200, description = "Sections found", body = [CourseSection]),
        (status = 400, description = "Missing professor", body = ErrorResponse),
        (status = 404, description = "No sections for this professor", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "course-information"
)]
pub async fn sections_by_professor(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<ProfessorParams>,
) -> Result<Json<Vec<CourseSection>>, AppError> {
    let professor = required(params.professor, "professor")?;

    let sections = state
        .catalog
        .sections_by_professor(&professor)
        .await
        .map_err(lookup_failed("sections_by_professor"))?;

    non_empty(sections, "No sections found for professor")
}

/// List courses offered under a major code.
#[utoipa::path(
    get,
    path = "/api/courseInformation/coursesByMajor",
    params(MajorParams),
    responses(
        (status = 200, description = "Courses found", body = [Course]),
        (status = 400, description = "Missing major", body = ErrorResponse),
        (status = 404, description = "No courses for this major", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "course-information"
)]
pub async fn courses_by_major(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<MajorParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let major = required(params.major, "major")?;

    let courses = state
        .catalog
        .courses_by_major(&major)
        .await
        .map_err(lookup_failed("courses_by_major"))?;

    non_empty(courses, "No courses found for major")
}

/// Get a single section by CRN.
#[utoipa::path(
    get,
    path = "/api/courseInformation/section-by-crn",
    params(CrnParams),
    responses(
        (status = 200, description = "Section found", body = CourseSection),
        (status = 400, description = "Missing CRN", body = ErrorResponse),
        (status = 404, description = "Section not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "course-information"
)]
pub async fn section_by_crn(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<CrnParams>,
) -> Result<Json<CourseSection>, AppError> {
    let crn = required(params.crn, "crn")?;

    let section = state
        .catalog
        .section_by_crn(&crn)
        .await
        .map_err(lookup_failed("section_by_crn"))?;

    present(section, "Section not found")
}

/// List courses by their Athena title.
#[utoipa::path(
    get,
    path = "/api/courseInformation/course-by-athena-name",
    params(AthenaNameParams),
    responses(
        (status = 200, description = "Courses found", body = [Course]),
        (status = 400, description = "Missing athenaName", body = ErrorResponse),
        (status = 404, description = "No course with this Athena name", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "course-information"
)]
pub async fn courses_by_athena_name(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<AthenaNameParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let athena_name = required(params.athena_name, "athenaName")?;

    let courses = state
        .catalog
        .courses_by_athena_name(&athena_name)
        .await
        .map_err(lookup_failed("courses_by_athena_name"))?;

    non_empty(courses, "No courses found for Athena name")
}

/// List every building. An empty catalog is still a 200.
#[utoipa::path(
    get,
    path = "/api/courseInformation/buildings",
    responses(
        (status = 200, description = "Buildings found", body = [Building]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "course-information"
)]
pub async fn all_buildings(State(state): State<AppState>) -> Result<Json<Vec<Building>>, AppError> {
    let buildings = state
        .catalog
        .all_buildings()
        .await
        .map_err(lookup_failed("all_buildings"))?;

    Ok(Json(buildings))
}

/// Whether a section is honors, lab and/or online.
#[utoipa::path(
    get,
    path = "/api/courseInformation/course/specialCourseTypes",
    params(CrnParams),
    responses(
        (status = 200, description = "Special types found", body = [SpecialCourseType]),
        (status = 400, description = "Missing CRN", body = ErrorResponse),
        (status = 404, description = "Section not found or has no special types", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "course-information"
)]
pub async fn special_course_types(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<CrnParams>,
) -> Result<Json<Vec<SpecialCourseType>>, AppError> {
    let crn = required(params.crn, "crn")?;

    let types = state
        .catalog
        .special_course_types(&crn)
        .await
        .map_err(lookup_failed("special_course_types"))?;

    non_empty(types, "No special course types found")
}

/// List every subject code. An empty catalog is still a 200.
#[utoipa::path(
    get,
    path = "/api/courseInformation/subjects",
    responses(
        (status = 200, description = "Subjects found", body = [String]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "course-information"
)]
pub async fn all_subjects(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let subjects = state
        .catalog
        .all_subjects()
        .await
        .map_err(lookup_failed("all_subjects"))?;

    Ok(Json(subjects))
}

/// List courses offered in a term.
#[utoipa::path(
    get,
    path = "/api/courseInformation/term",
    params(TermParams),
    responses(
        (status = 200, description = "Courses found", body = [Course]),
        (status = 400, description = "Missing term", body = ErrorResponse),
        (status = 404, description = "No courses in this term", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "bulletin"
)]
pub async fn courses_by_term(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<TermParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let term = required(params.term, "term")?;

    let courses = state
        .catalog
        .courses_by_term(&term)
        .await
        .map_err(lookup_failed("courses_by_term"))?;

    non_empty(courses, "No courses found for term")
}

/// Get a single course by id.
#[utoipa::path(
    get,
    path = "/api/courseInformation/getCourseById",
    params(CourseIdParams),
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 400, description = "Missing courseId", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "bulletin"
)]
pub async fn course_by_id(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<CourseIdParams>,
) -> Result<Json<Course>, AppError> {
    let course_id = required(params.course_id, "courseId")?;

    let course = state
        .catalog
        .course_by_id(&course_id)
        .await
        .map_err(lookup_failed("course_by_id"))?;

    present(course, "Course not found")
}

/// Search courses by credit hours, optionally narrowed by major and level.
#[utoipa::path(
    get,
    path = "/api/courseInformation/courses",
    params(CourseSearchParams),
    responses(
        (status = 200, description = "Courses found", body = [Course]),
        (status = 400, description = "Missing or out-of-range parameter", body = ErrorResponse),
        (status = 404, description = "No matching courses", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "bulletin"
)]
pub async fn search_courses(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<CourseSearchParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let credit_hours = optional_int::<u8>(params.credit_hours, "creditHours")?
        .ok_or_else(|| bad_request("creditHours is required"))?;

    let filter = CourseFilter {
        credit_hours,
        major_code: optional(params.major_code),
        class_level: optional_int::<u16>(params.class_level, "classLevel")?,
    };
    filter.validate()?;

    let courses = state
        .catalog
        .courses_matching(&filter)
        .await
        .map_err(lookup_failed("courses_matching"))?;

    non_empty(courses, "No courses match the given filters")
}

fn course_ref(params: CourseRefParams) -> Result<CourseRef, AppError> {
    if let Some(course_id) = optional(params.course_id) {
        return Ok(CourseRef::CourseId(course_id));
    }
    optional(params.crn)
        .map(CourseRef::Crn)
        .ok_or_else(|| bad_request("courseId or crn is required"))
}

/// List the co-requisites of a course, named by id or CRN.
#[utoipa::path(
    get,
    path = "/api/courseInformation/course/coreqs",
    params(CourseRefParams),
    responses(
        (status = 200, description = "Co-requisites found", body = [Course]),
        (status = 400, description = "Neither courseId nor crn given", body = ErrorResponse),
        (status = 404, description = "No co-requisites", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "bulletin"
)]
pub async fn corequisites(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<CourseRefParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let course = course_ref(params)?;

    let courses = state
        .catalog
        .corequisites(&course)
        .await
        .map_err(lookup_failed("corequisites"))?;

    non_empty(courses, "No co-requisites found")
}

/// List the prerequisites of a course, named by id or CRN.
#[utoipa::path(
    get,
    path = "/api/courseInformation/course/prereqs",
    params(CourseRefParams),
    responses(
        (status = 200, description = "Prerequisites found", body = [Course]),
        (status = 400, description = "Neither courseId nor crn given", body = ErrorResponse),
        (status = 404, description = "No prerequisites", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "bulletin"
)]
pub async fn prerequisites(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<CourseRefParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let course = course_ref(params)?;

    let courses = state
        .catalog
        .prerequisites(&course)
        .await
        .map_err(lookup_failed("prerequisites"))?;

    non_empty(courses, "No prerequisites found")
}

/// List sections meeting in a time slot, optionally for one CRN.
#[utoipa::path(
    get,
    path = "/api/courseInformation/course/sections",
    params(SectionSearchParams),
    responses(
        (status = 200, description = "Sections found", body = [CourseSection]),
        (status = 400, description = "Neither timeSlot nor crn given, or malformed timeSlot", body = ErrorResponse),
        (status = 404, description = "No matching sections", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "bulletin"
)]
pub async fn sections_by_time_slot(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<SectionSearchParams>,
) -> Result<Json<Vec<CourseSection>>, AppError> {
    let time_slot = optional(params.time_slot)
        .map(|raw| {
            raw.parse::<TimeSlot>()
                .map_err(|e| bad_request(format!("invalid timeSlot: {}", e)))
        })
        .transpose()?;
    let crn = optional(params.crn);

    if time_slot.is_none() && crn.is_none() {
        return Err(bad_request("timeSlot or crn is required"));
    }

    let sections = state
        .catalog
        .sections_by_time_slot(time_slot.as_ref(), crn.as_deref())
        .await
        .map_err(lookup_failed("sections_by_time_slot"))?;

    non_empty(sections, "No sections found")
}

/// List courses that fulfil a requirement.
#[utoipa::path(
    get,
    path = "/api/courseInformation/requirement",
    params(RequirementParams),
    responses(
        (status = 200, description = "Courses found", body = [Course]),
        (status = 400, description = "Missing requirement", body = ErrorResponse),
        (status = 404, description = "No courses fulfil this requirement", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "bulletin"
)]
pub async fn courses_by_requirement(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery<RequirementParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let requirement = required(params.requirement, "requirement")?;

    let courses = state
        .catalog
        .courses_by_requirement(&requirement)
        .await
        .map_err(lookup_failed("courses_by_requirement"))?;

    non_empty(courses, "No courses found for requirement")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank_values() {
        assert!(required(None, "crn").is_err());
        assert!(required(Some("   ".to_string()), "crn").is_err());
        assert_eq!(required(Some(" 43123 ".to_string()), "crn").unwrap(), "43123");
    }

    #[test]
    fn optional_int_rejects_garbage() {
        assert_eq!(optional_int::<u8>(None, "creditHours").unwrap(), None);
        assert_eq!(
            optional_int::<u8>(Some("3".to_string()), "creditHours").unwrap(),
            Some(3)
        );
        assert!(optional_int::<u8>(Some("three".to_string()), "creditHours").is_err());
        assert!(optional_int::<u8>(Some("-1".to_string()), "creditHours").is_err());
    }

    #[test]
    fn course_id_takes_precedence_over_crn() {
        let params = CourseRefParams {
            course_id: Some("CSCI-1302".to_string()),
            crn: Some("43123".to_string()),
        };
        assert_eq!(
            course_ref(params).unwrap(),
            CourseRef::CourseId("CSCI-1302".to_string())
        );

        let crn_only = CourseRefParams {
            course_id: Some(String::new()),
            crn: Some("43123".to_string()),
        };
        assert_eq!(
            course_ref(crn_only).unwrap(),
            CourseRef::Crn("43123".to_string())
        );

        assert!(course_ref(CourseRefParams::default()).is_err());
    }
}
