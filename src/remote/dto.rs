use serde::Deserialize;

use crate::models::{CatalogCourse, ScheduleConflict};

#[derive(Debug, Deserialize)]
pub struct CourseListResponse {
    #[serde(default)]
    pub courses: Vec<CatalogCourse>,
    #[serde(default)]
    pub total_available: Option<u32>,
    #[serde(default)]
    pub total_matches: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SubjectsResponse {
    #[serde(default)]
    pub subjects: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnrolledCoursesResponse {
    #[serde(default)]
    pub enrolled_courses: Vec<CatalogCourse>,
}

#[derive(Debug, Deserialize)]
pub struct ConflictsResponse {
    #[serde(default)]
    pub conflicts: Vec<ScheduleConflict>,
}

/// Acknowledgement body returned by mutating endpoints.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
