use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::due::{DueStatus, parse_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Stored status. "Overdue" is derived from the due date, never stored.
/// The backend spells the open state `pending`; `todo` is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[serde(rename = "pending", alias = "todo")]
    Todo,
    InProgress,
    Completed,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Todo => "pending",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub course_code: String,
    pub due_date: String,
    pub priority: Priority,
    pub status: AssignmentStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
}

impl Assignment {
    pub fn due_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.due_date)
    }

    /// Recomputed on every call; `now` moves independently of any state change.
    pub fn due_status(&self, now: NaiveDateTime) -> Option<DueStatus> {
        self.due_at().map(|due| DueStatus::between(due, now))
    }

    pub fn days_until_due(&self, now: NaiveDateTime) -> Option<i64> {
        self.due_status(now).map(|s| s.days_until_due())
    }

    /// Completed work is never overdue.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        match self.status {
            AssignmentStatus::Completed => false,
            AssignmentStatus::Todo | AssignmentStatus::InProgress => self
                .due_status(now)
                .is_some_and(|s| s.is_overdue()),
        }
    }
}

/// The backend hands out integer ids; other deployments use strings.
fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// Form state for the "new assignment" dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentDraft {
    pub title: String,
    pub description: String,
    pub course_code: String,
    /// `YYYY-MM-DD` as picked in the date input.
    pub due_date: String,
    pub priority: Priority,
    pub estimated_hours: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAssignment {
    pub title: String,
    pub description: String,
    pub course_code: String,
    pub due_date: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
}

impl NewAssignment {
    /// The due date is submitted as the end of the chosen day.
    pub fn from_draft(draft: &AssignmentDraft, due: NaiveDate) -> Self {
        Self {
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            course_code: draft.course_code.clone(),
            due_date: format!("{}T23:59:59", due.format("%Y-%m-%d")),
            priority: draft.priority,
            estimated_hours: draft.estimated_hours,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAssignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AssignmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentFilter {
    pub status: Option<AssignmentStatus>,
    pub course_code: Option<String>,
    pub priority: Option<Priority>,
}

impl AssignmentFilter {
    /// Query pairs in the backend's parameter names; unset filters are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status_filter", status.as_str().to_string()));
        }
        if let Some(code) = self.course_code.as_ref().filter(|c| !c.is_empty()) {
            pairs.push(("course_code", code.clone()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default, rename = "pending", alias = "todo")]
    pub todo: u32,
    #[serde(default)]
    pub in_progress: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub overdue: u32,
    #[serde(default)]
    pub due_today: u32,
    #[serde(default)]
    pub due_this_week: u32,
}

impl AssignmentStats {
    /// Whole-percent completion, 0 for an empty list.
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            (f64::from(self.completed) / f64::from(self.total) * 100.0).round() as u32
        }
    }
}
