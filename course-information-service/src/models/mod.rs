pub mod building;
pub mod course;
pub mod section;
pub mod time_slot;

pub use building::Building;
pub use course::Course;
pub use section::{CourseSection, MeetingTime, SpecialCourseType};
pub use time_slot::{TimeSlot, TimeSlotParseError};
