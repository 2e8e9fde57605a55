use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::AppError;
use crate::models::CatalogCourse;
use crate::remote::StudyFlowApi;

pub const SEARCH_LIMIT: u32 = 100;
/// Size of the catalog page shown before the student types anything.
pub const BROWSE_LIMIT: u32 = 50;

pub struct CourseSearch {
    api: Arc<dyn StudyFlowApi>,
    debounce: Duration,
}

impl CourseSearch {
    pub fn new(api: Arc<dyn StudyFlowApi>, debounce: Duration) -> Self {
        Self { api, debounce }
    }

    pub async fn browse(&self) -> Result<Vec<CatalogCourse>, AppError> {
        self.api.list_courses(BROWSE_LIMIT).await
    }

    pub async fn subjects(&self) -> Result<Vec<String>, AppError> {
        self.api.list_subjects().await
    }

    /// Waits out the debounce delay, then picks the endpoint from the inputs.
    ///
    /// Earlier calls are not cancelled; callers that fire on every keystroke
    /// keep only the last result.
    pub async fn search(
        &self,
        query: &str,
        subject: Option<&str>,
    ) -> Result<Vec<CatalogCourse>, AppError> {
        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }

        let query = query.trim();
        let subject = subject.map(str::trim).filter(|s| !s.is_empty());

        let courses = match (query.is_empty(), subject) {
            (true, None) => self.api.list_courses(SEARCH_LIMIT).await?,
            (true, Some(subject)) => self.api.courses_by_subject(subject, SEARCH_LIMIT).await?,
            (false, subject) => {
                self.api
                    .search_courses(Some(query), subject, SEARCH_LIMIT)
                    .await?
            }
        };

        debug!(
            "Course search q={:?} subject={:?} returned {}",
            query,
            subject,
            courses.len()
        );
        Ok(courses)
    }
}
