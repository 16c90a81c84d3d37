use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

use super::{CatalogError, CourseFilter, CourseInformationService, CourseRef};
use crate::models::{Building, Course, CourseSection, SpecialCourseType, TimeSlot};

/// Catalog backed by the `courses`, `sections` and `buildings` collections.
#[derive(Clone)]
pub struct MongoCatalog {
    client: MongoClient,
    db: Database,
}

impl MongoCatalog {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for course-information-service");

        let unique = |name: &str| {
            IndexOptions::builder()
                .name(name.to_string())
                .unique(true)
                .build()
        };
        let named = |name: &str| IndexOptions::builder().name(name.to_string()).build();

        self.courses()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "courseId": 1 })
                    .options(unique("course_id_unique"))
                    .build(),
                None,
            )
            .await?;
        self.courses()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "subject": 1, "courseNumber": 1 })
                    .options(named("subject_number_lookup"))
                    .build(),
                None,
            )
            .await?;
        tracing::info!("Created indexes on courses.(courseId) and courses.(subject, courseNumber)");

        self.sections()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "crn": 1 })
                    .options(unique("crn_unique"))
                    .build(),
                None,
            )
            .await?;
        self.sections()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "professor": 1 })
                    .options(named("professor_lookup"))
                    .build(),
                None,
            )
            .await?;
        tracing::info!("Created indexes on sections.(crn) and sections.(professor)");

        Ok(())
    }

    pub fn courses(&self) -> Collection<Course> {
        self.db.collection("courses")
    }

    pub fn sections(&self) -> Collection<CourseSection> {
        self.db.collection("sections")
    }

    pub fn buildings(&self) -> Collection<Building> {
        self.db.collection("buildings")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    async fn find_courses(&self, filter: Document) -> Result<Vec<Course>, CatalogError> {
        let options = FindOptions::builder()
            .sort(doc! { "subject": 1, "courseNumber": 1 })
            .build();
        let cursor = self.courses().find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_sections(&self, filter: Document) -> Result<Vec<CourseSection>, CatalogError> {
        let options = FindOptions::builder().sort(doc! { "crn": 1 }).build();
        let cursor = self.sections().find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn resolve(&self, course: &CourseRef) -> Result<Option<Course>, CatalogError> {
        let course_id = match course {
            CourseRef::CourseId(id) => id.clone(),
            CourseRef::Crn(crn) => match self.section_by_crn(crn).await? {
                Some(section) => section.course_id,
                None => return Ok(None),
            },
        };
        self.course_by_id(&course_id).await
    }

    async fn related(&self, ids: Vec<String>) -> Result<Vec<Course>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_courses(doc! { "courseId": { "$in": ids } }).await
    }
}

/// Escape regex metacharacters so user input is matched literally.
fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Anchored pattern for a slot's start time. Stored times may zero-pad the
/// hour and vary in case and spacing around the meridiem.
fn start_time_pattern(slot: &TimeSlot) -> String {
    format!(
        "^\\s*0?{}:{}\\s*{}\\s*$",
        slot.start.format("%-I"),
        slot.start.format("%M"),
        slot.start.format("%p"),
    )
}

fn section_filter(time_slot: Option<&TimeSlot>, crn: Option<&str>) -> Document {
    let mut filter = Document::new();
    if let Some(crn) = crn {
        filter.insert("crn", crn);
    }
    if let Some(slot) = time_slot {
        filter.insert(
            "meetings.startTime",
            doc! { "$regex": start_time_pattern(slot), "$options": "i" },
        );
    }
    filter
}

fn course_filter(filter: &CourseFilter) -> Document {
    let mut query = doc! { "creditHours": i32::from(filter.credit_hours) };
    if let Some(code) = &filter.major_code {
        query.insert("subject", code.as_str());
    }
    if let Some(level) = filter.class_level {
        query.insert(
            "courseNumber",
            doc! { "$regex": format!("^{}", level / 1000) },
        );
    }
    query
}

#[async_trait]
impl CourseInformationService for MongoCatalog {
    async fn sections_by_professor(
        &self,
        professor: &str,
    ) -> Result<Vec<CourseSection>, CatalogError> {
        self.find_sections(doc! {
            "professor": {
                "$regex": format!("^{}$", escape_regex(professor)),
                "$options": "i",
            }
        })
        .await
    }

    async fn courses_by_major(&self, major: &str) -> Result<Vec<Course>, CatalogError> {
        self.find_courses(doc! { "subject": major }).await
    }

    async fn section_by_crn(&self, crn: &str) -> Result<Option<CourseSection>, CatalogError> {
        Ok(self.sections().find_one(doc! { "crn": crn }, None).await?)
    }

    async fn courses_by_athena_name(
        &self,
        athena_name: &str,
    ) -> Result<Vec<Course>, CatalogError> {
        self.find_courses(doc! { "athenaName": athena_name }).await
    }

    async fn all_buildings(&self) -> Result<Vec<Building>, CatalogError> {
        let options = FindOptions::builder().sort(doc! { "number": 1 }).build();
        let cursor = self.buildings().find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn special_course_types(
        &self,
        crn: &str,
    ) -> Result<Vec<SpecialCourseType>, CatalogError> {
        Ok(self
            .section_by_crn(crn)
            .await?
            .map(|section| section.special_types())
            .unwrap_or_default())
    }

    async fn all_subjects(&self) -> Result<Vec<String>, CatalogError> {
        let values = self.courses().distinct("subject", None, None).await?;
        let mut subjects: Vec<String> = values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(s) => Some(s),
                _ => None,
            })
            .collect();
        subjects.sort();
        Ok(subjects)
    }

    async fn courses_by_term(&self, term: &str) -> Result<Vec<Course>, CatalogError> {
        self.find_courses(doc! { "terms": term }).await
    }

    async fn course_by_id(&self, course_id: &str) -> Result<Option<Course>, CatalogError> {
        Ok(self
            .courses()
            .find_one(doc! { "courseId": course_id }, None)
            .await?)
    }

    async fn courses_matching(&self, filter: &CourseFilter) -> Result<Vec<Course>, CatalogError> {
        self.find_courses(course_filter(filter)).await
    }

    async fn corequisites(&self, course: &CourseRef) -> Result<Vec<Course>, CatalogError> {
        match self.resolve(course).await? {
            Some(course) => self.related(course.corequisites).await,
            None => Ok(Vec::new()),
        }
    }

    async fn prerequisites(&self, course: &CourseRef) -> Result<Vec<Course>, CatalogError> {
        match self.resolve(course).await? {
            Some(course) => self.related(course.prerequisites).await,
            None => Ok(Vec::new()),
        }
    }

    async fn sections_by_time_slot(
        &self,
        time_slot: Option<&TimeSlot>,
        crn: Option<&str>,
    ) -> Result<Vec<CourseSection>, CatalogError> {
        let candidates = self.find_sections(section_filter(time_slot, crn)).await?;
        Ok(match time_slot {
            Some(slot) => candidates
                .into_iter()
                .filter(|s| s.meetings.iter().any(|m| slot.matches(m)))
                .collect(),
            None => candidates,
        })
    }

    async fn courses_by_requirement(
        &self,
        requirement: &str,
    ) -> Result<Vec<Course>, CatalogError> {
        self.find_courses(doc! { "requirements": requirement }).await
    }

    async fn health_check(&self) -> Result<(), CatalogError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}
