use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// One weekly meeting of a section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTime {
    #[schema(example = "MWF")]
    pub days: String,
    #[schema(example = "10:20 AM")]
    pub start_time: String,
    #[schema(example = "11:10 AM")]
    pub end_time: String,
    /// Building number, see `Building::number`.
    pub building: String,
    pub room: String,
}

/// A scheduled offering of a course in one term, identified by its CRN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSection {
    #[schema(example = "43123")]
    pub crn: String,
    #[schema(example = "CSCI-1302")]
    pub course_id: String,
    #[serde(default)]
    pub section_number: String,
    #[schema(example = "Fall 2025")]
    pub term: String,
    pub professor: String,
    pub credit_hours: u8,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub enrolled: u32,
    #[serde(default)]
    pub honors: bool,
    #[serde(default)]
    pub lab: bool,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub meetings: Vec<MeetingTime>,
}

/// Flags that mark a section as something other than a regular lecture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SpecialCourseType {
    Honors,
    Lab,
    Online,
}

impl fmt::Display for SpecialCourseType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpecialCourseType::Honors => write!(f, "honors"),
            SpecialCourseType::Lab => write!(f, "lab"),
            SpecialCourseType::Online => write!(f, "online"),
        }
    }
}

impl CourseSection {
    pub fn special_types(&self) -> Vec<SpecialCourseType> {
        [
            (self.honors, SpecialCourseType::Honors),
            (self.lab, SpecialCourseType::Lab),
            (self.online, SpecialCourseType::Online),
        ]
        .into_iter()
        .filter_map(|(set, kind)| set.then_some(kind))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_types_follow_flags_in_fixed_order() {
        let section: CourseSection = serde_json::from_value(serde_json::json!({
            "crn": "1",
            "courseId": "CSCI-1302",
            "term": "Fall 2025",
            "professor": "Barnes",
            "creditHours": 4,
            "online": true,
            "honors": true
        }))
        .unwrap();

        assert_eq!(
            section.special_types(),
            vec![SpecialCourseType::Honors, SpecialCourseType::Online]
        );
        assert_eq!(SpecialCourseType::Online.to_string(), "online");
    }
}
