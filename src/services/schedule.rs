use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{
    Course, DayOfWeek, ManualScheduleEntry, Schedule, ScheduleConflict, ScheduleDraft, TimeSlot,
};
use crate::remote::StudyFlowApi;
use crate::services::InFlight;
use crate::validation::{self, ValidationErrors};

#[derive(Debug, Clone, Default)]
pub struct ScheduleOverview {
    pub schedule: Schedule,
    pub conflicts: Vec<ScheduleConflict>,
}

pub struct ScheduleService {
    api: Arc<dyn StudyFlowApi>,
    submitting: InFlight,
    editing_slots: InFlight,
}

impl ScheduleService {
    pub fn new(api: Arc<dyn StudyFlowApi>) -> Self {
        Self {
            api,
            submitting: InFlight::new(),
            editing_slots: InFlight::new(),
        }
    }

    /// A failed conflict check does not hide the schedule itself.
    pub async fn load(&self) -> Result<ScheduleOverview, AppError> {
        let schedule = self.api.schedule().await?;
        let conflicts = match self.api.schedule_conflicts().await {
            Ok(conflicts) => conflicts,
            Err(e) => {
                warn!("Could not load schedule conflicts: {}", e);
                Vec::new()
            }
        };

        if !conflicts.is_empty() {
            info!("{} schedule conflicts", conflicts.len());
        }
        Ok(ScheduleOverview {
            schedule,
            conflicts,
        })
    }

    pub async fn add_entry(
        &self,
        draft: &ScheduleDraft,
        enrolled: &[Course],
    ) -> Result<ManualScheduleEntry, AppError> {
        validation::validate_schedule_draft(draft, enrolled).map_err(AppError::Validation)?;

        let title = enrolled
            .iter()
            .find(|c| c.code == draft.course_code)
            .map(|c| c.title.as_str());
        let entry = ManualScheduleEntry::from_draft(draft, title);

        let _guard = self.submitting.begin()?;
        self.api.add_manual_entry(&entry).await?;
        info!(
            "Added {} on {} {}-{}",
            entry.course_code,
            entry.day.as_str(),
            entry.start_time,
            entry.end_time
        );
        Ok(entry)
    }

    pub async fn add_slot(&self, course_code: &str, slot: &TimeSlot) -> Result<(), AppError> {
        if let Err(message) = validation::validate_time_range(&slot.start_time, &slot.end_time) {
            let mut errors = ValidationErrors::new();
            errors.add("end_time", message);
            return Err(AppError::Validation(errors));
        }

        let _guard = self.editing_slots.begin()?;
        self.api.add_time_slot(course_code, slot).await
    }

    pub async fn remove_slot(
        &self,
        course_code: &str,
        day: DayOfWeek,
        start_time: &str,
    ) -> Result<(), AppError> {
        let _guard = self.editing_slots.begin()?;
        self.api.remove_time_slot(course_code, day, start_time).await?;
        info!("Removed {} slot on {} at {}", course_code, day.as_str(), start_time);
        Ok(())
    }
}
