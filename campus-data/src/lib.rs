//! # campus-data
//!
//! Static reference data for the campus assistant. The [`Catalog`] is built
//! once at startup and never mutated; nothing here is persisted.

pub mod catalog;
pub mod records;

pub use catalog::{ALL_COURSES, Catalog, STUDY_STYLES};
pub use records::{Announcement, CampusLocation, Course, Event, Review, StudentProfile};
