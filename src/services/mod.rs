pub mod assignments;
pub mod auth;
pub mod chat;
pub mod course_search;
pub mod enrollment;
pub mod in_flight;
pub mod schedule;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use chat::ChatSession;
pub use course_search::CourseSearch;
pub use enrollment::EnrollmentService;
pub use in_flight::{InFlight, InFlightGuard};
pub use schedule::{ScheduleOverview, ScheduleService};
