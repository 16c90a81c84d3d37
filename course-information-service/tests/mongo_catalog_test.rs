//! MongoDB catalog tests.
//!
//! Run with: MONGODB_URI=mongodb://localhost:27017 cargo test -p course-information-service -- --ignored

mod common;

use common::SAMPLE_CATALOG;
use course_information_service::{
    models::{Building, CourseSection, SpecialCourseType, TimeSlot},
    services::{CatalogSnapshot, CourseFilter, CourseInformationService, CourseRef, MongoCatalog},
};

struct SeededCatalog {
    catalog: MongoCatalog,
    database: String,
}

impl SeededCatalog {
    async fn teardown(self) {
        self.catalog
            .client()
            .database(&self.database)
            .drop(None)
            .await
            .expect("Failed to drop test database");
    }
}

fn extra_section(crn: &str, professor: &str, start: &str, end: &str) -> CourseSection {
    serde_json::from_value(serde_json::json!({
        "crn": crn,
        "courseId": "ENGL-1101",
        "term": "Fall 2025",
        "professor": professor,
        "creditHours": 3,
        "meetings": [
            {"days": "MW", "startTime": start, "endTime": end, "building": "0032", "room": "0150"}
        ]
    }))
    .unwrap()
}

/// Fresh database seeded with the sample export plus two sections whose
/// stored values differ in case from what callers send.
async fn seeded_catalog() -> SeededCatalog {
    let uri = std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let database = format!(
        "course_information_test_{}",
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );

    let catalog = MongoCatalog::connect(&uri, &database)
        .await
        .expect("Failed to connect to MongoDB");
    catalog
        .initialize_indexes()
        .await
        .expect("Failed to create indexes");

    let raw = std::fs::read(SAMPLE_CATALOG).unwrap();
    let mut snapshot: CatalogSnapshot = serde_json::from_slice(&raw).unwrap();
    snapshot
        .sections
        .push(extra_section("60001", "José Ñúñez", "8:00 am", "9:15 am"));
    snapshot
        .sections
        .push(extra_section("60002", "Jane Doe", "09:35 AM", "10:50 AM"));

    catalog.courses().insert_many(snapshot.courses, None).await.unwrap();
    catalog.sections().insert_many(snapshot.sections, None).await.unwrap();
    catalog.buildings().insert_many(snapshot.buildings, None).await.unwrap();

    SeededCatalog { catalog, database }
}

fn crns(sections: &[CourseSection]) -> Vec<&str> {
    sections.iter().map(|s| s.crn.as_str()).collect()
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn health_check_pings_database() {
    let seeded = seeded_catalog().await;
    seeded.catalog.health_check().await.unwrap();
    seeded.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn indexes_reject_duplicate_crn() {
    let seeded = seeded_catalog().await;

    let duplicate = extra_section("43123", "Someone Else", "1:00 PM", "1:50 PM");
    let result = seeded.catalog.sections().insert_one(duplicate, None).await;
    assert!(result.is_err());

    // Idempotent on an already indexed database
    seeded.catalog.initialize_indexes().await.unwrap();
    seeded.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn professor_match_is_anchored_and_case_insensitive() {
    let seeded = seeded_catalog().await;
    let catalog = &seeded.catalog;

    let sections = catalog.sections_by_professor("bradley barnes").await.unwrap();
    assert_eq!(crns(&sections), vec!["43123", "43124"]);

    let sections = catalog.sections_by_professor("JOSÉ ÑÚÑEZ").await.unwrap();
    assert_eq!(crns(&sections), vec!["60001"]);

    assert!(catalog.sections_by_professor("Barnes").await.unwrap().is_empty());
    assert!(catalog.sections_by_professor("Bradley.*").await.unwrap().is_empty());

    seeded.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn course_lookups() {
    let seeded = seeded_catalog().await;
    let catalog = &seeded.catalog;

    let csci: Vec<String> = catalog
        .courses_by_major("CSCI")
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.course_id)
        .collect();
    assert_eq!(csci, vec!["CSCI-1301", "CSCI-1302", "CSCI-4730"]);

    let by_athena = catalog
        .courses_by_athena_name("OPERATING SYSTEMS")
        .await
        .unwrap();
    assert_eq!(by_athena[0].course_id, "CSCI-4730");

    assert_eq!(catalog.courses_by_term("Spring 2026").await.unwrap().len(), 3);
    assert_eq!(
        catalog
            .courses_by_requirement("Quantitative Reasoning")
            .await
            .unwrap()
            .len(),
        2
    );

    let course = catalog.course_by_id("CSCI-1302").await.unwrap().unwrap();
    assert_eq!(course.title, "Software Development");
    assert!(catalog.course_by_id("CSCI-9999").await.unwrap().is_none());

    seeded.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn course_search_applies_every_filter() {
    let seeded = seeded_catalog().await;
    let catalog = &seeded.catalog;

    let filter = CourseFilter {
        credit_hours: 4,
        major_code: Some("CSCI".to_string()),
        class_level: Some(4000),
    };
    let courses = catalog.courses_matching(&filter).await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course_id, "CSCI-4730");

    let filter = CourseFilter {
        credit_hours: 3,
        major_code: None,
        class_level: None,
    };
    assert_eq!(catalog.courses_matching(&filter).await.unwrap()[0].course_id, "ENGL-1101");

    seeded.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn section_lookups_by_crn() {
    let seeded = seeded_catalog().await;
    let catalog = &seeded.catalog;

    let section = catalog.section_by_crn("51877").await.unwrap().unwrap();
    assert_eq!(section.professor, "Maria Hybinette");
    assert!(catalog.section_by_crn("99999").await.unwrap().is_none());

    assert_eq!(
        catalog.special_course_types("43124").await.unwrap(),
        vec![SpecialCourseType::Honors, SpecialCourseType::Lab]
    );
    assert!(catalog.special_course_types("99999").await.unwrap().is_empty());

    seeded.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn listings_are_sorted() {
    let seeded = seeded_catalog().await;
    let catalog = &seeded.catalog;

    assert_eq!(catalog.all_subjects().await.unwrap(), vec!["CSCI", "ENGL", "MATH"]);

    let buildings: Vec<Building> = catalog.all_buildings().await.unwrap();
    let numbers: Vec<&str> = buildings.iter().map(|b| b.number.as_str()).collect();
    assert_eq!(numbers, vec!["0032", "1023"]);

    seeded.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn requisites_resolve_through_course_id_or_crn() {
    let seeded = seeded_catalog().await;
    let catalog = &seeded.catalog;

    let prereqs = catalog
        .prerequisites(&CourseRef::CourseId("CSCI-4730".to_string()))
        .await
        .unwrap();
    assert_eq!(prereqs[0].course_id, "CSCI-1302");

    let prereqs = catalog
        .prerequisites(&CourseRef::Crn("43123".to_string()))
        .await
        .unwrap();
    assert_eq!(prereqs[0].course_id, "CSCI-1301");

    let coreqs = catalog
        .corequisites(&CourseRef::CourseId("CSCI-1302".to_string()))
        .await
        .unwrap();
    assert_eq!(coreqs[0].course_id, "MATH-2250");

    assert!(catalog
        .corequisites(&CourseRef::Crn("99999".to_string()))
        .await
        .unwrap()
        .is_empty());

    seeded.teardown().await;
}

#[tokio::test]
#[ignore] // Requires MongoDB
async fn time_slot_matches_stored_spelling_variants() {
    let seeded = seeded_catalog().await;
    let catalog = &seeded.catalog;

    let slot: TimeSlot = "9:35 AM - 10:50 AM".parse().unwrap();
    let sections = catalog.sections_by_time_slot(Some(&slot), None).await.unwrap();
    assert_eq!(crns(&sections), vec!["43123", "60002"]);

    let slot: TimeSlot = "8:00 AM - 9:15 AM".parse().unwrap();
    let sections = catalog.sections_by_time_slot(Some(&slot), None).await.unwrap();
    assert_eq!(crns(&sections), vec!["60001"]);

    let sections = catalog
        .sections_by_time_slot(Some(&slot), Some("43123"))
        .await
        .unwrap();
    assert!(sections.is_empty());

    let sections = catalog.sections_by_time_slot(None, Some("20418")).await.unwrap();
    assert_eq!(crns(&sections), vec!["20418"]);

    seeded.teardown().await;
}
