pub mod catalog;
pub mod error;
pub mod mongo;
pub mod snapshot;

pub use catalog::{CourseFilter, CourseInformationService, CourseRef};
pub use error::CatalogError;
pub use mongo::MongoCatalog;
pub use snapshot::{CatalogSnapshot, SnapshotCatalog};
