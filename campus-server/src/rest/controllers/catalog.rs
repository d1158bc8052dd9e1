//! Read-only reference data.

use crate::AppState;
use axum::Json;
use axum::extract::State;
use campus_data::{Announcement, CampusLocation, Course, Event, StudentProfile};

/// GET /api/announcements
pub async fn announcements(State(state): State<AppState>) -> Json<Vec<Announcement>> {
    Json(state.catalog.announcements().to_vec())
}

/// GET /api/events
pub async fn events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.catalog.events().to_vec())
}

/// GET /api/locations
pub async fn locations(State(state): State<AppState>) -> Json<Vec<CampusLocation>> {
    Json(state.catalog.locations().to_vec())
}

/// GET /api/courses
pub async fn courses(State(state): State<AppState>) -> Json<Vec<Course>> {
    Json(state.catalog.courses().to_vec())
}

/// GET /api/students
pub async fn students(State(state): State<AppState>) -> Json<Vec<StudentProfile>> {
    Json(state.catalog.students().to_vec())
}

/// GET /api/groups
pub async fn groups(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.campus_groups().to_vec())
}

/// GET /api/activities
pub async fn activities(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.campus_activities().to_vec())
}

/// GET /api/subjects
pub async fn subjects(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.tutor_subjects().to_vec())
}
