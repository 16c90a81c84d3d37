//! The catalog lookup seam between HTTP handlers and data backends.

use async_trait::async_trait;
use validator::Validate;

use super::CatalogError;
use crate::models::{Building, Course, CourseSection, SpecialCourseType, TimeSlot};

/// Filters for `GET /courses`. `credit_hours` is required, the rest narrow further.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CourseFilter {
    #[validate(range(min = 1, max = 4, message = "creditHours must be between 1 and 4"))]
    pub credit_hours: u8,
    pub major_code: Option<String>,
    #[validate(range(
        min = 1000,
        max = 9999,
        message = "classLevel must be between 1000 and 9999"
    ))]
    pub class_level: Option<u16>,
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        course.credit_hours == self.credit_hours
            && self
                .major_code
                .as_deref()
                .map_or(true, |code| course.subject == code)
            && self
                .class_level
                .map_or(true, |level| course.class_level() == Some(level / 1000 * 1000))
    }
}

/// A course named either directly or through one of its sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseRef {
    CourseId(String),
    Crn(String),
}

#[async_trait]
pub trait CourseInformationService: Send + Sync {
    /// Sections taught by `professor`, matched case-insensitively.
    async fn sections_by_professor(
        &self,
        professor: &str,
    ) -> Result<Vec<CourseSection>, CatalogError>;

    /// Courses whose subject code equals `major`.
    async fn courses_by_major(&self, major: &str) -> Result<Vec<Course>, CatalogError>;

    async fn section_by_crn(&self, crn: &str) -> Result<Option<CourseSection>, CatalogError>;

    async fn courses_by_athena_name(&self, athena_name: &str)
        -> Result<Vec<Course>, CatalogError>;

    async fn all_buildings(&self) -> Result<Vec<Building>, CatalogError>;

    /// Honors/lab/online markers of the section; empty when the CRN is unknown.
    async fn special_course_types(&self, crn: &str)
        -> Result<Vec<SpecialCourseType>, CatalogError>;

    /// Distinct subject codes, sorted.
    async fn all_subjects(&self) -> Result<Vec<String>, CatalogError>;

    async fn courses_by_term(&self, term: &str) -> Result<Vec<Course>, CatalogError>;

    async fn course_by_id(&self, course_id: &str) -> Result<Option<Course>, CatalogError>;

    async fn courses_matching(&self, filter: &CourseFilter) -> Result<Vec<Course>, CatalogError>;

    async fn corequisites(&self, course: &CourseRef) -> Result<Vec<Course>, CatalogError>;

    async fn prerequisites(&self, course: &CourseRef) -> Result<Vec<Course>, CatalogError>;

    /// Sections meeting in `time_slot`, optionally restricted to one CRN.
    /// With no slot, the CRN alone selects the section.
    async fn sections_by_time_slot(
        &self,
        time_slot: Option<&TimeSlot>,
        crn: Option<&str>,
    ) -> Result<Vec<CourseSection>, CatalogError>;

    /// Courses that fulfil the named requirement.
    async fn courses_by_requirement(&self, requirement: &str)
        -> Result<Vec<Course>, CatalogError>;

    async fn health_check(&self) -> Result<(), CatalogError>;
}
