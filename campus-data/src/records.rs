use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    pub name: String,
    pub date: String,
    pub location: String,
}

/// A building or venue the campus guide can describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusLocation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub hours: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub name: String,
    pub major: String,
    pub courses: Vec<String>,
    pub study_style: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    pub author: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub department: String,
    pub description: String,
    pub reviews: Vec<Review>,
}

impl CampusLocation {
    pub(crate) fn new(name: &str, kind: &str, hours: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            hours: hours.to_string(),
            description: description.to_string(),
        }
    }
}

impl StudentProfile {
    pub(crate) fn new(name: &str, major: &str, courses: &[&str], study_style: &str) -> Self {
        Self {
            name: name.to_string(),
            major: major.to_string(),
            courses: courses.iter().map(|c| c.to_string()).collect(),
            study_style: study_style.to_string(),
        }
    }
}

impl Review {
    pub fn new(id: u64, author: impl Into<String>, rating: u8, comment: impl Into<String>) -> Self {
        Self { id, author: author.into(), rating, comment: comment.into() }
    }
}

