use crate::records::{Announcement, CampusLocation, Course, Event, Review, StudentProfile};

/// Every course code a student can pick in the study-buddy finder.
pub const ALL_COURSES: [&str; 8] =
    ["CS101", "PHYS201", "MATH300", "CHEM101", "HIST101", "ENG202", "BIO210", "ART101"];

pub const STUDY_STYLES: [&str; 5] = ["Quiet", "Group", "Collaborative", "Focused", "Online"];

/// Read-only reference data, built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Catalog {
    announcements: Vec<Announcement>,
    events: Vec<Event>,
    locations: Vec<CampusLocation>,
    students: Vec<StudentProfile>,
    courses: Vec<Course>,
    campus_groups: Vec<String>,
    campus_activities: Vec<String>,
    tutor_subjects: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The sample data shipped with the service.
    pub fn builtin() -> Self {
        Self {
            announcements: builtin_announcements(),
            events: builtin_events(),
            locations: builtin_locations(),
            students: builtin_students(),
            courses: builtin_courses(),
            campus_groups: strings(&[
                "Debate Club",
                "Coding Crew",
                "Art & Soul Society",
                "Photography Club",
                "International Students Association",
                "Varsity Sports",
                "Drama Club",
                "Music Ensemble",
                "Volunteering Group",
                "Entrepreneurship Hub",
            ]),
            campus_activities: strings(&[
                "Hackathon",
                "Art Exhibition",
                "Freshers Week",
                "Guest Lecture Series",
                "Music Fest",
                "Career Fair",
                "Sports Day",
                "Drama Production",
                "Cultural Night",
                "Startup Pitch Competition",
            ]),
            tutor_subjects: strings(&[
                "Calculus",
                "Physics",
                "Computer Science",
                "Chemistry",
                "World History",
                "English Literature",
                "Biology",
            ]),
        }
    }

    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn locations(&self) -> &[CampusLocation] {
        &self.locations
    }

    pub fn students(&self) -> &[StudentProfile] {
        &self.students
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn campus_groups(&self) -> &[String] {
        &self.campus_groups
    }

    pub fn campus_activities(&self) -> &[String] {
        &self.campus_activities
    }

    pub fn tutor_subjects(&self) -> &[String] {
        &self.tutor_subjects
    }

    /// Case-insensitive lookup by location name.
    pub fn find_location(&self, name: &str) -> Option<&CampusLocation> {
        let wanted = name.to_lowercase();
        self.locations.iter().find(|loc| loc.name.to_lowercase() == wanted)
    }

    pub fn location_names(&self) -> Vec<&str> {
        self.locations.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn student(&self, name: &str) -> Option<&StudentProfile> {
        self.students.iter().find(|s| s.name == name)
    }

    /// The signed-in student. There is no authentication, so this is the first profile.
    pub fn current_user(&self) -> Option<&StudentProfile> {
        self.students.first()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_announcements() -> Vec<Announcement> {
    [
        (
            "Library Hours Extended for Finals",
            "The main library will be open 24/7 starting next week to help students prepare for final exams.",
            "3 days ago",
        ),
        (
            "New Student Art Gallery Opening",
            "Come see the amazing work of our talented student artists at the new gallery in the Fine Arts building.",
            "1 week ago",
        ),
        (
            "Campus Shuttle Schedule Update",
            "Please note the updated shuttle schedule for the holiday break, effective from December 18th.",
            "2 weeks ago",
        ),
    ]
    .into_iter()
    .zip(1..)
    .map(|((title, content, date), id)| Announcement {
        id,
        title: title.to_string(),
        content: content.to_string(),
        date: date.to_string(),
    })
    .collect()
}

fn builtin_events() -> Vec<Event> {
    [
        ("Winter Wonderland Gala", "DEC 22", "Student Union Ballroom"),
        ("Guest Lecture: AI in Modern Society", "JAN 10", "Lecture Hall C"),
        ("Spring Semester Club Fair", "JAN 25", "Main Quad"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, date, location), id)| Event {
        id,
        name: name.to_string(),
        date: date.to_string(),
        location: location.to_string(),
    })
    .collect()
}

fn builtin_locations() -> Vec<CampusLocation> {
    vec![
        CampusLocation::new(
            "Main Library",
            "Academic",
            "Mon-Fri 7am-11pm, Sat-Sun 9am-9pm",
            "Four floors of stacks, quiet study rooms, and the campus writing center.",
        ),
        CampusLocation::new(
            "Student Union",
            "Student Life",
            "Daily 7am-midnight",
            "Food court, ballroom, club offices, and the campus bookstore.",
        ),
        CampusLocation::new(
            "Tech Building",
            "Academic",
            "Open 24/7 for students in the program",
            "Home of Computer Science and Engineering, with labs and a makerspace.",
        ),
        CampusLocation::new(
            "Science Center",
            "Academic",
            "Mon-Fri 8am-10pm",
            "Chemistry, physics, and biology labs plus the planetarium.",
        ),
        CampusLocation::new(
            "Athletics Complex",
            "Recreation",
            "Mon-Sun 6am-10pm",
            "Gym, indoor pool, climbing wall, and the varsity stadium.",
        ),
    ]
}

fn builtin_students() -> Vec<StudentProfile> {
    vec![
        StudentProfile::new("Alex Doe", "Computer Science", &["CS101", "MATH300", "PHYS201"], "Focused"),
        StudentProfile::new("Priya Patel", "Computer Science", &["CS101", "MATH300"], "Quiet"),
        StudentProfile::new("Marcus Lee", "Physics", &["PHYS201", "MATH300", "CHEM101"], "Group"),
        StudentProfile::new("Sofia Garcia", "Biology", &["BIO210", "CHEM101"], "Collaborative"),
        StudentProfile::new("Liam O'Brien", "History", &["HIST101", "ENG202"], "Online"),
        StudentProfile::new("Hana Kim", "Fine Arts", &["ART101", "ENG202"], "Collaborative"),
        StudentProfile::new("Noah Williams", "Mathematics", &["MATH300", "CS101"], "Quiet"),
    ]
}

fn builtin_courses() -> Vec<Course> {
    let course = |id: &str, name: &str, department: &str, description: &str, reviews: Vec<Review>| Course {
        id: id.to_string(),
        name: name.to_string(),
        department: department.to_string(),
        description: description.to_string(),
        reviews,
    };
    vec![
        course(
            "CS101",
            "Introduction to Computer Science",
            "Computer Science",
            "Fundamentals of programming, algorithms, and problem solving.",
            vec![
                Review::new(1, "Jordan M.", 5, "Great intro course, the labs really helped me understand loops."),
                Review::new(2, "Taylor R.", 4, "Challenging assignments but the TAs are very helpful."),
                Review::new(3, "Sam K.", 3, "Lectures move fast; start the projects early."),
            ],
        ),
        course(
            "PHYS201",
            "Classical Mechanics",
            "Physics",
            "Newtonian mechanics, energy, momentum, and oscillations.",
            vec![
                Review::new(4, "Chris P.", 4, "Tough problem sets but very rewarding once it clicks."),
                Review::new(5, "Dana W.", 2, "Exams felt much harder than the homework."),
            ],
        ),
        course(
            "MATH300",
            "Linear Algebra",
            "Mathematics",
            "Vector spaces, linear maps, eigenvalues, and applications.",
            vec![Review::new(6, "Riley S.", 5, "The professor explains proofs clearly and patiently.")],
        ),
        course(
            "HIST101",
            "World History",
            "History",
            "A survey of global history from antiquity to the modern era.",
            vec![
                Review::new(7, "Morgan T.", 4, "Lots of reading, but the discussions are fascinating."),
                Review::new(8, "Casey L.", 4, "Fair grading and interesting essay topics."),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_location_is_case_insensitive() {
        let catalog = Catalog::builtin();
        let lib = catalog.find_location("main library").unwrap();
        assert_eq!(lib.name, "Main Library");
        assert!(catalog.find_location("Moon Base").is_none());
    }

    #[test]
    fn test_tech_building_record() {
        let catalog = Catalog::builtin();
        let tech = catalog.find_location("Tech Building").unwrap();
        assert_eq!(tech.kind, "Academic");
        assert_eq!(tech.hours, "Open 24/7 for students in the program");

        let json = serde_json::to_value(tech).unwrap();
        assert_eq!(json["type"], "Academic");
    }

    #[test]
    fn test_students_use_known_courses_and_styles() {
        let catalog = Catalog::builtin();
        for student in catalog.students() {
            assert!(STUDY_STYLES.contains(&student.study_style.as_str()));
            for course in &student.courses {
                assert!(ALL_COURSES.contains(&course.as_str()), "{course}");
            }
        }
        assert_eq!(catalog.current_user().unwrap().name, "Alex Doe");
    }

    #[test]
    fn test_student_serializes_camel_case() {
        let catalog = Catalog::builtin();
        let json = serde_json::to_value(&catalog.students()[0]).unwrap();
        assert_eq!(json["studyStyle"], "Focused");
    }

    #[test]
    fn test_reference_lists() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.announcements().len(), 3);
        assert_eq!(catalog.events()[2].location, "Main Quad");
        assert_eq!(catalog.campus_groups().len(), 10);
        assert_eq!(catalog.campus_activities()[0], "Hackathon");
        assert_eq!(catalog.location_names().len(), 5);
        assert_eq!(catalog.course("MATH300").unwrap().reviews.len(), 1);
    }
}
