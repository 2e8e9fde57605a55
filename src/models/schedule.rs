use serde::{Deserialize, Serialize};

use crate::models::CourseColor;
use crate::validation::parse_clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    #[serde(alias = "lecture")]
    Lecture,
    #[serde(alias = "lab")]
    Lab,
    #[serde(alias = "tutorial")]
    Tutorial,
    #[serde(alias = "other")]
    Other,
    #[serde(alias = "personal")]
    Personal,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Lecture => "Lecture",
            SessionType::Lab => "Lab",
            SessionType::Tutorial => "Tutorial",
            SessionType::Other => "Other",
            SessionType::Personal => "Personal",
        }
    }
}

/// One recurring weekly block. Times are `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type")]
    pub kind: SessionType,
}

impl TimeSlot {
    pub fn start_minutes(&self) -> Option<u32> {
        parse_clock(&self.start_time)
    }

    pub fn end_minutes(&self) -> Option<u32> {
        parse_clock(&self.end_time)
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        match (self.start_minutes(), self.end_minutes()) {
            (Some(s), Some(e)) if s < e => Some(e - s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Course code, or the event title for personal entries.
    pub course_code: String,
    pub course_title: String,
    #[serde(default)]
    pub color: CourseColor,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub is_personal: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(rename = "schedule", default)]
    pub entries: Vec<ScheduleEntry>,
    #[serde(default)]
    pub total_courses: u32,
    #[serde(default)]
    pub total_hours_per_week: f64,
}

/// Overlap reported by the backend; never computed locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub course1: String,
    pub course2: String,
    pub day: String,
}

/// Form state for the "add to schedule" dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub is_personal: bool,
    pub course_code: String,
    /// Personal event title; ignored for course entries.
    pub title: String,
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub session_type: SessionType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualScheduleEntry {
    pub course_code: String,
    pub course_title: String,
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub session_type: SessionType,
    pub is_personal: bool,
}

impl ManualScheduleEntry {
    /// Personal events are keyed by their title; course entries take the
    /// enrolled course's title when known.
    pub fn from_draft(draft: &ScheduleDraft, course_title: Option<&str>) -> Self {
        let (course_code, course_title) = if draft.is_personal {
            (draft.title.trim().to_string(), draft.title.trim().to_string())
        } else {
            (
                draft.course_code.clone(),
                course_title.unwrap_or(&draft.course_code).to_string(),
            )
        };

        Self {
            course_code,
            course_title,
            day: draft.day,
            start_time: draft.start_time.trim().to_string(),
            end_time: draft.end_time.trim().to_string(),
            location: draft.location.trim().to_string(),
            session_type: draft.session_type,
            is_personal: draft.is_personal,
        }
    }

    /// Multipart text fields in the order the backend's form handler reads them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("course_code", self.course_code.clone()),
            ("course_title", self.course_title.clone()),
            ("day", self.day.as_str().to_string()),
            ("start_time", self.start_time.clone()),
            ("end_time", self.end_time.clone()),
            ("location", self.location.clone()),
            ("session_type", self.session_type.as_str().to_string()),
            ("is_personal", self.is_personal.to_string()),
        ]
    }
}
