use crate::invoker::{FlowInvoker, call};
use crate::notice::{Notice, UiError, UiResult};
use campus_data::{Catalog, StudentProfile};
use campus_flow::flows::study_buddy::{NAME, StudyBuddyInput, StudyBuddyOutput};
use tracing::warn;

const FAILURE: &str = "Sorry, we couldn't find matches at this time. Please try again later.";

#[derive(Debug, Clone)]
pub struct StudyBuddyFinder {
    current_user: StudentProfile,
    candidates: Vec<StudentProfile>,
    matches: Option<StudyBuddyOutput>,
    loading: bool,
}

impl StudyBuddyFinder {
    /// Returns `None` when the catalog has no students.
    pub fn new(catalog: &Catalog) -> Option<Self> {
        let current_user = catalog.current_user()?.clone();
        Some(Self::with_profiles(current_user, catalog.students().to_vec()))
    }

    pub fn with_profiles(current_user: StudentProfile, candidates: Vec<StudentProfile>) -> Self {
        Self { current_user, candidates, matches: None, loading: false }
    }

    /// Form defaults: the current user's own courses and study style.
    pub fn current_user(&self) -> &StudentProfile {
        &self.current_user
    }

    pub fn matches(&self) -> Option<&StudyBuddyOutput> {
        self.matches.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Search with the form's courses and study style merged into the profile.
    pub async fn find(
        &mut self,
        invoker: &dyn FlowInvoker,
        courses: Vec<String>,
        study_style: impl Into<String>,
    ) -> UiResult<&StudyBuddyOutput> {
        if !courses.iter().any(|c| !c.is_empty()) {
            return Err(UiError::rejected("Invalid search", "You have to select at least one course."));
        }
        self.matches = None;
        let input = StudyBuddyInput {
            current_user: StudentProfile {
                courses,
                study_style: study_style.into(),
                ..self.current_user.clone()
            },
            potential_buddies: self.candidates.clone(),
        };

        self.loading = true;
        let result: campus_core::Result<StudyBuddyOutput> = call(invoker, NAME, &input).await;
        self.loading = false;

        match result {
            Ok(output) => Ok(&*self.matches.insert(output)),
            Err(source) => {
                warn!(error = %source, "study buddy search failed");
                Err(UiError::Failed { notice: Notice::failure(FAILURE), source })
            }
        }
    }
}
