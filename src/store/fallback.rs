use sqlx::SqlitePool;
use tracing::warn;

use crate::db::repository;
use crate::error::AppError;
use crate::models::Course;

pub const ENROLLED_COURSES_KEY: &str = "enrolledCourses";

/// Last-known enrolled courses, read only when the backend is unreachable.
///
/// There is no TTL and no reconciliation with the backend: after an offline
/// enrollment the two lists differ until the next successful load overwrites
/// the mirror.
#[derive(Clone)]
pub struct FallbackStore {
    db: SqlitePool,
}

impl FallbackStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Empty when nothing was written yet or the stored list no longer parses.
    pub async fn read(&self) -> Result<Vec<Course>, AppError> {
        let Some(raw) = repository::get_item(&self.db, ENROLLED_COURSES_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Course>>(&raw) {
            Ok(courses) => Ok(courses),
            Err(e) => {
                warn!("stored course list is corrupt ({}); ignoring it", e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn write(&self, courses: &[Course]) -> Result<(), AppError> {
        let raw = serde_json::to_string(courses)?;
        repository::set_item(&self.db, ENROLLED_COURSES_KEY, &raw).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        repository::remove_item(&self.db, ENROLLED_COURSES_KEY).await?;
        Ok(())
    }
}
