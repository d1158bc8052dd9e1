use crate::invoker::{FlowInvoker, call};
use crate::notice::{Notice, UiError, UiResult};
use campus_data::{Catalog, Course, Review};
use campus_flow::flows::reviews::{NAME, ReviewSummaryInput, ReviewSummaryOutput};
use tracing::warn;

pub const OWN_AUTHOR: &str = "Alex Doe (You)";
pub const MIN_REVIEWS_FOR_SUMMARY: usize = 2;
pub const MIN_COMMENT_CHARS: usize = 10;

/// Course list with a locally editable review list per course.
#[derive(Debug, Clone)]
pub struct ReviewBoard {
    courses: Vec<Course>,
    selected: usize,
    summary: Option<String>,
    summarizing: bool,
}

impl ReviewBoard {
    pub fn new(catalog: &Catalog) -> Self {
        Self::from_courses(catalog.courses().to_vec())
    }

    pub fn from_courses(courses: Vec<Course>) -> Self {
        Self { courses, selected: 0, summary: None, summarizing: false }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn selected(&self) -> Option<&Course> {
        self.courses.get(self.selected)
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn is_summarizing(&self) -> bool {
        self.summarizing
    }

    /// Select a course by id. Clears the current summary.
    pub fn select_course(&mut self, id: &str) -> bool {
        match self.courses.iter().position(|c| c.id == id) {
            Some(index) => {
                self.selected = index;
                self.summary = None;
                true
            }
            None => false,
        }
    }

    pub async fn summarize(&mut self, invoker: &dyn FlowInvoker) -> UiResult<String> {
        self.summary = None;
        let Some(course) = self.selected() else {
            return Err(UiError::rejected("No course selected", "Please select a course."));
        };
        if course.reviews.len() < MIN_REVIEWS_FOR_SUMMARY {
            return Err(UiError::rejected(
                "Not enough reviews",
                "Need at least 2 reviews to generate a summary.",
            ));
        }
        let input = ReviewSummaryInput {
            course_name: course.name.clone(),
            reviews: course.reviews.iter().map(|r| r.comment.clone()).collect(),
        };

        self.summarizing = true;
        let result: campus_core::Result<ReviewSummaryOutput> = call(invoker, NAME, &input).await;
        self.summarizing = false;

        match result {
            Ok(output) => {
                self.summary = Some(output.summary.clone());
                Ok(output.summary)
            }
            Err(source) => {
                warn!(course = %input.course_name, error = %source, "review summary failed");
                Err(UiError::Failed {
                    notice: Notice::error(
                        "Error generating summary",
                        "Could not generate summary at this time. Please try again later.",
                    ),
                    source,
                })
            }
        }
    }

    /// Add a review by the current user to the top of the selected course's list.
    pub fn submit_review(&mut self, rating: Option<u8>, comment: &str) -> UiResult<Notice> {
        let Some(rating) = rating.filter(|r| (1..=5).contains(r)) else {
            return Err(UiError::rejected("Invalid review", "Please select a rating."));
        };
        if comment.chars().count() < MIN_COMMENT_CHARS {
            return Err(UiError::rejected("Invalid review", "Comment must be at least 10 characters."));
        }
        let Some(course) = self.courses.get_mut(self.selected) else {
            return Err(UiError::rejected("No course selected", "Please select a course."));
        };
        let id = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        course.reviews.insert(0, Review::new(id, OWN_AUTHOR, rating, comment));
        Ok(Notice::success("Review submitted!", "Thank you for your feedback."))
    }
}
