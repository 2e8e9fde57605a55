use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::{CatalogCourse, Course, CourseColor};
use crate::state::AppState;
use crate::store::Sourced;

/// The student's personal course list.
///
/// Reads and writes go to the backend first. When it cannot be reached the
/// local mirror answers instead and the result is tagged `LocalFallback`.
/// Application errors never touch the mirror.
pub struct EnrollmentService<'a> {
    state: &'a mut AppState,
}

impl<'a> EnrollmentService<'a> {
    pub fn new(state: &'a mut AppState) -> Self {
        Self { state }
    }

    pub async fn load(&mut self) -> Result<Sourced<Vec<Course>>, AppError> {
        let result = self.state.api.enrolled_courses().await;

        let sourced = match result {
            Ok(remote) => {
                let known = self.known_colors().await;
                let courses: Vec<Course> = remote
                    .iter()
                    .map(|c| {
                        let color = known
                            .iter()
                            .find(|k| k.code == c.code)
                            .map(|k| k.color)
                            .unwrap_or_else(CourseColor::random);
                        Course::from_catalog(c, color)
                    })
                    .collect();
                self.state.fallback.write(&courses).await?;
                debug!("Loaded {} enrolled courses from backend", courses.len());
                Sourced::remote(courses)
            }
            Err(e) if e.is_connectivity() => {
                warn!("Backend unreachable, using stored courses: {}", e);
                Sourced::local(self.state.fallback.read().await?)
            }
            Err(e) => return self.state.settle(Err(e)).await,
        };

        self.state.enrolled = sourced.value.clone();
        Ok(sourced)
    }

    /// Rejects duplicates and anonymous users before any request is made.
    pub async fn enroll(&mut self, course: &CatalogCourse) -> Result<Sourced<Course>, AppError> {
        if !self.state.is_authenticated() {
            return Err(AppError::NotAuthenticated);
        }
        self.ensure_loaded().await?;
        if self.is_enrolled(&course.code) {
            return Err(AppError::AlreadyEnrolled(course.code.clone()));
        }

        let result = self.state.api.enroll(&course.code).await;
        let added = Course::from_catalog(course, CourseColor::random());

        let sourced = match result {
            Ok(()) => {
                info!("Enrolled in {}", course.code);
                Sourced::remote(added)
            }
            Err(e) if e.is_connectivity() => {
                warn!("Backend unreachable, enrolling in {} locally: {}", course.code, e);
                Sourced::local(added)
            }
            Err(e) => return self.state.settle(Err(e)).await,
        };

        self.state.enrolled.push(sourced.value.clone());
        self.state.fallback.write(&self.state.enrolled).await?;
        Ok(sourced)
    }

    pub async fn unenroll(&mut self, course_code: &str) -> Result<Sourced<()>, AppError> {
        if !self.state.is_authenticated() {
            return Err(AppError::NotAuthenticated);
        }
        self.ensure_loaded().await?;

        let sourced = match self.state.api.unenroll(course_code).await {
            Ok(()) => {
                info!("Unenrolled from {}", course_code);
                Sourced::remote(())
            }
            Err(e) if e.is_connectivity() => {
                warn!("Backend unreachable, unenrolling from {} locally: {}", course_code, e);
                Sourced::local(())
            }
            Err(e) => return self.state.settle(Err(e)).await,
        };

        self.state.enrolled.retain(|c| c.code != course_code);
        self.state.fallback.write(&self.state.enrolled).await?;
        Ok(sourced)
    }

    pub fn is_enrolled(&self, course_code: &str) -> bool {
        self.state.enrolled.iter().any(|c| c.code == course_code)
    }

    /// Falls back to the mirror when nothing has been loaded this session, so
    /// a write-back never drops stored courses.
    async fn ensure_loaded(&mut self) -> Result<(), AppError> {
        if self.state.enrolled.is_empty() {
            self.state.enrolled = self.state.fallback.read().await?;
        }
        Ok(())
    }

    /// Colors already assigned, so a reload does not repaint every card.
    async fn known_colors(&self) -> Vec<Course> {
        if !self.state.enrolled.is_empty() {
            return self.state.enrolled.clone();
        }
        self.state.fallback.read().await.unwrap_or_default()
    }
}
