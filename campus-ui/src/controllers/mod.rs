mod campus_guide;
mod chat;
mod recommendations;
mod reviews;
mod study_buddy;
mod tutor;
mod wellness;

pub use campus_guide::CampusGuideController;
pub use chat::ChatSession;
pub use recommendations::{MIN_INTEREST_CHARS, Recommendations, RecommendationsController, split_list};
pub use reviews::{MIN_COMMENT_CHARS, MIN_REVIEWS_FOR_SUMMARY, OWN_AUTHOR, ReviewBoard};
pub use study_buddy::StudyBuddyFinder;
pub use tutor::TutorController;
pub use wellness::{BREATHING_EXERCISE_TEXT, BREATHING_REPLY, BREATHING_REQUEST, WellnessController};
