use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Semester label stamped on courses enrolled from the catalog.
pub const CURRENT_SEMESTER: &str = "Fall 2025";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseColor {
    Red,
    Purple,
    Blue,
    Yellow,
    Green,
    #[default]
    Gray,
    Orange,
    Pink,
    Indigo,
}

impl CourseColor {
    pub const PALETTE: [CourseColor; 9] = [
        CourseColor::Red,
        CourseColor::Purple,
        CourseColor::Blue,
        CourseColor::Yellow,
        CourseColor::Green,
        CourseColor::Gray,
        CourseColor::Orange,
        CourseColor::Pink,
        CourseColor::Indigo,
    ];

    pub fn random() -> Self {
        Self::PALETTE
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CourseColor::Red => "red",
            CourseColor::Purple => "purple",
            CourseColor::Blue => "blue",
            CourseColor::Yellow => "yellow",
            CourseColor::Green => "green",
            CourseColor::Gray => "gray",
            CourseColor::Orange => "orange",
            CourseColor::Pink => "pink",
            CourseColor::Indigo => "indigo",
        }
    }
}

/// A course in the student's personal list. The color is local display state,
/// the backend never sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    #[serde(alias = "name")]
    pub title: String,
    pub semester: String,
    #[serde(default)]
    pub color: CourseColor,
}

impl Course {
    pub fn from_catalog(course: &CatalogCourse, color: CourseColor) -> Self {
        Self {
            code: course.code.clone(),
            title: course.title.clone(),
            semester: CURRENT_SEMESTER.to_string(),
            color,
        }
    }
}

/// Course record as served by the backend catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCourse {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub credits: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
}
