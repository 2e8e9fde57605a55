use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::{
    Assignment, AssignmentDraft, AssignmentFilter, AssignmentStats, AssignmentStatus,
    NewAssignment, UpdateAssignment,
};
use crate::remote::StudyFlowApi;
use crate::services::InFlight;
use crate::validation;

/// One busy flag per form: the create form, the edit form and the delete
/// confirmation. Status toggles are not guarded.
pub struct AssignmentService {
    api: Arc<dyn StudyFlowApi>,
    submitting: InFlight,
    saving: InFlight,
    deleting: InFlight,
}

impl AssignmentService {
    pub fn new(api: Arc<dyn StudyFlowApi>) -> Self {
        Self {
            api,
            submitting: InFlight::new(),
            saving: InFlight::new(),
            deleting: InFlight::new(),
        }
    }

    pub async fn list(&self, filter: &AssignmentFilter) -> Result<Vec<Assignment>, AppError> {
        let assignments = self.api.list_assignments(filter).await?;
        debug!("Fetched {} assignments ({:?})", assignments.len(), filter);
        Ok(assignments)
    }

    pub async fn get(&self, id: &str) -> Result<Assignment, AppError> {
        self.api.get_assignment(id).await
    }

    pub async fn stats(&self) -> Result<AssignmentStats, AppError> {
        self.api.assignment_stats().await
    }

    /// `today` is the student's local calendar day; a due date before it is
    /// rejected without a request.
    pub async fn create(
        &self,
        draft: &AssignmentDraft,
        today: NaiveDate,
    ) -> Result<Assignment, AppError> {
        validation::validate_assignment_draft(draft, today).map_err(AppError::Validation)?;
        let due = NaiveDate::parse_from_str(draft.due_date.trim(), "%Y-%m-%d").map_err(|_| {
            let mut errors = validation::ValidationErrors::new();
            errors.add("due_date", "Due date must use the YYYY-MM-DD format");
            AppError::Validation(errors)
        })?;

        let _guard = self.submitting.begin()?;
        let created = self
            .api
            .create_assignment(&NewAssignment::from_draft(draft, due))
            .await?;
        info!("Created assignment {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: AssignmentStatus,
    ) -> Result<Assignment, AppError> {
        let update = UpdateAssignment {
            status: Some(status),
            ..Default::default()
        };
        let updated = self.api.update_assignment(id, &update).await?;
        debug!("Assignment {} is now {:?}", id, updated.status);
        Ok(updated)
    }

    pub async fn update(&self, id: &str, update: &UpdateAssignment) -> Result<Assignment, AppError> {
        let _guard = self.saving.begin()?;
        let updated = self.api.update_assignment(id, update).await?;
        debug!("Updated assignment {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.deleting.begin()?;
        self.api.delete_assignment(id).await?;
        info!("Deleted assignment {}", id);
        Ok(())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_active()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_active()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.is_active()
    }
}
