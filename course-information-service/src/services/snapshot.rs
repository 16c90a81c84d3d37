//! In-memory catalog backed by a JSON export of the extracted course data.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use super::{CatalogError, CourseFilter, CourseInformationService, CourseRef};
use crate::models::{Building, Course, CourseSection, SpecialCourseType, TimeSlot};

/// On-disk layout of a catalog export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub sections: Vec<CourseSection>,
    #[serde(default)]
    pub buildings: Vec<Building>,
}

#[derive(Clone)]
pub struct SnapshotCatalog {
    snapshot: Arc<CatalogSnapshot>,
}

impl SnapshotCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let snapshot_error = |source: anyhow::Error| CatalogError::Snapshot {
            path: path.display().to_string(),
            source,
        };

        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| snapshot_error(e.into()))?;
        let snapshot: CatalogSnapshot =
            serde_json::from_slice(&raw).map_err(|e| snapshot_error(e.into()))?;

        tracing::info!(
            path = %path.display(),
            courses = snapshot.courses.len(),
            sections = snapshot.sections.len(),
            buildings = snapshot.buildings.len(),
            "Loaded catalog snapshot"
        );

        Ok(Self::new(snapshot))
    }

    fn courses_where(&self, predicate: impl Fn(&Course) -> bool) -> Vec<Course> {
        self.snapshot
            .courses
            .iter()
            .filter(|c| predicate(c))
            .cloned()
            .collect()
    }

    fn find_section(&self, crn: &str) -> Option<&CourseSection> {
        self.snapshot.sections.iter().find(|s| s.crn == crn)
    }

    fn find_course(&self, course_id: &str) -> Option<&Course> {
        self.snapshot
            .courses
            .iter()
            .find(|c| c.course_id == course_id)
    }

    fn resolve(&self, course: &CourseRef) -> Option<&Course> {
        match course {
            CourseRef::CourseId(id) => self.find_course(id),
            CourseRef::Crn(crn) => self
                .find_section(crn)
                .and_then(|section| self.find_course(&section.course_id)),
        }
    }

    fn related(&self, ids: &[String]) -> Vec<Course> {
        self.courses_where(|c| ids.contains(&c.course_id))
    }
}

#[async_trait]
impl CourseInformationService for SnapshotCatalog {
    async fn sections_by_professor(
        &self,
        professor: &str,
    ) -> Result<Vec<CourseSection>, CatalogError> {
        let professor = professor.to_lowercase();
        Ok(self
            .snapshot
            .sections
            .iter()
            .filter(|s| s.professor.to_lowercase() == professor)
            .cloned()
            .collect())
    }

    async fn courses_by_major(&self, major: &str) -> Result<Vec<Course>, CatalogError> {
        Ok(self.courses_where(|c| c.subject == major))
    }

    async fn section_by_crn(&self, crn: &str) -> Result<Option<CourseSection>, CatalogError> {
        Ok(self.find_section(crn).cloned())
    }

    async fn courses_by_athena_name(
        &self,
        athena_name: &str,
    ) -> Result<Vec<Course>, CatalogError> {
        Ok(self.courses_where(|c| c.athena_name == athena_name))
    }

    async fn all_buildings(&self) -> Result<Vec<Building>, CatalogError> {
        Ok(self.snapshot.buildings.clone())
    }

    async fn special_course_types(
        &self,
        crn: &str,
    ) -> Result<Vec<SpecialCourseType>, CatalogError> {
        Ok(self
            .find_section(crn)
            .map(CourseSection::special_types)
            .unwrap_or_default())
    }

    async fn all_subjects(&self) -> Result<Vec<String>, CatalogError> {
        let subjects: BTreeSet<&str> = self
            .snapshot
            .courses
            .iter()
            .map(|c| c.subject.as_str())
            .collect();
        Ok(subjects.into_iter().map(str::to_string).collect())
    }

    async fn courses_by_term(&self, term: &str) -> Result<Vec<Course>, CatalogError> {
        Ok(self.courses_where(|c| c.terms.iter().any(|t| t == term)))
    }

    async fn course_by_id(&self, course_id: &str) -> Result<Option<Course>, CatalogError> {
        Ok(self.find_course(course_id).cloned())
    }

    async fn courses_matching(&self, filter: &CourseFilter) -> Result<Vec<Course>, CatalogError> {
        Ok(self.courses_where(|c| filter.matches(c)))
    }

    async fn corequisites(&self, course: &CourseRef) -> Result<Vec<Course>, CatalogError> {
        Ok(self
            .resolve(course)
            .map(|c| self.related(&c.corequisites))
            .unwrap_or_default())
    }

    async fn prerequisites(&self, course: &CourseRef) -> Result<Vec<Course>, CatalogError> {
        Ok(self
            .resolve(course)
            .map(|c| self.related(&c.prerequisites))
            .unwrap_or_default())
    }

    async fn sections_by_time_slot(
        &self,
        time_slot: Option<&TimeSlot>,
        crn: Option<&str>,
    ) -> Result<Vec<CourseSection>, CatalogError> {
        Ok(self
            .snapshot
            .sections
            .iter()
            .filter(|s| crn.map_or(true, |crn| s.crn == crn))
            .filter(|s| time_slot.map_or(true, |slot| s.meetings.iter().any(|m| slot.matches(m))))
            .cloned()
            .collect())
    }

    async fn courses_by_requirement(
        &self,
        requirement: &str,
    ) -> Result<Vec<Course>, CatalogError> {
        Ok(self.courses_where(|c| c.requirements.iter().any(|r| r == requirement)))
    }

    async fn health_check(&self) -> Result<(), CatalogError> {
        Ok(())
    }
}
