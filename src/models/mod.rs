pub mod assignment;
pub mod chat;
pub mod course;
pub mod schedule;
pub mod user;

pub use assignment::{
    Assignment, AssignmentDraft, AssignmentFilter, AssignmentStats, AssignmentStatus,
    NewAssignment, Priority, UpdateAssignment,
};
pub use chat::{AttachmentMeta, ChatAttachment, ChatMessage, ChatReply, Sender};
pub use course::{CatalogCourse, Course, CourseColor};
pub use schedule::{
    DayOfWeek, ManualScheduleEntry, Schedule, ScheduleConflict, ScheduleDraft, ScheduleEntry,
    SessionType, TimeSlot,
};
pub use user::{AuthResponse, LoginForm, RegisterForm, RegisterRequest, Session, User};
