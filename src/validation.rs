//! Field validation for the login, registration, assignment and schedule forms.
//!
//! Every check is a pure function returning `Err` with the message shown next
//! to the field. The form-level validators collect all failing fields so a
//! submission can be blocked with every reason at once.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use crate::models::{AssignmentDraft, Course, LoginForm, RegisterForm, ScheduleDraft};

pub const INSTITUTIONAL_EMAIL_SUFFIX: &str = "@uottawa.ca";
pub const MIN_PASSWORD_LEN: usize = 6;
pub const STUDENT_ID_LEN: usize = 9;

pub const EMAIL_MESSAGE: &str = "Please use your uOttawa email (@uottawa.ca)";
pub const PASSWORD_MESSAGE: &str = "Password must be at least 6 characters";
pub const STUDENT_ID_MESSAGE: &str = "Student ID must be exactly 9 digits";
pub const DUE_DATE_PAST_MESSAGE: &str = "Due date cannot be in the past";

/// Field name to message, ordered by field name for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Records the outcome of a single field check.
    pub fn check(&mut self, field: &'static str, result: Result<(), &'static str>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.ends_with(INSTITUTIONAL_EMAIL_SUFFIX) {
        Ok(())
    } else {
        Err(EMAIL_MESSAGE)
    }
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(PASSWORD_MESSAGE)
    }
}

/// The student id is optional; only a non-empty value is checked.
pub fn validate_student_id(student_id: &str) -> Result<(), &'static str> {
    if student_id.is_empty()
        || (student_id.len() == STUDENT_ID_LEN && student_id.bytes().all(|b| b.is_ascii_digit()))
    {
        Ok(())
    } else {
        Err(STUDENT_ID_MESSAGE)
    }
}

/// Time of day is ignored: anything on `today` or later passes.
pub fn validate_due_date(due: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if due < today {
        Err(DUE_DATE_PAST_MESSAGE)
    } else {
        Ok(())
    }
}

/// Parses a `HH:MM` clock time into minutes after midnight.
pub fn parse_clock(time: &str) -> Option<u32> {
    let (hours, minutes) = time.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours < 24 && minutes < 60 {
        Some(hours * 60 + minutes)
    } else {
        None
    }
}

pub fn validate_time_range(start: &str, end: &str) -> Result<(), &'static str> {
    match (parse_clock(start), parse_clock(end)) {
        (Some(s), Some(e)) if s < e => Ok(()),
        (Some(_), Some(_)) => Err("End time must be after start time"),
        _ => Err("Times must use the HH:MM format"),
    }
}

pub fn validate_login(form: &LoginForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check("email", validate_email(&form.email));
    errors.check("password", validate_password(&form.password));
    errors.into_result()
}

pub fn validate_registration(form: &RegisterForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check("email", validate_email(&form.email));
    errors.check("password", validate_password(&form.password));
    errors.check("student_id", validate_student_id(&form.student_id));
    if form.full_name.trim().is_empty() {
        errors.add("full_name", "Full name is required");
    }
    errors.into_result()
}

pub fn validate_assignment_draft(
    draft: &AssignmentDraft,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.title.trim().is_empty() {
        errors.add("title", "Assignment title is required");
    }
    if draft.description.trim().is_empty() {
        errors.add("description", "Assignment description is required");
    }
    if draft.course_code.is_empty() {
        errors.add("course_code", "Please select a course");
    }
    if draft.due_date.trim().is_empty() {
        errors.add("due_date", "Due date is required");
    } else {
        match NaiveDate::parse_from_str(draft.due_date.trim(), "%Y-%m-%d") {
            Ok(due) => errors.check("due_date", validate_due_date(due, today)),
            Err(_) => errors.add("due_date", "Due date must use the YYYY-MM-DD format"),
        }
    }
    if let Some(hours) = draft.estimated_hours {
        if !hours.is_finite() || hours < 0.0 {
            errors.add("estimated_hours", "Estimated hours must be a positive number");
        }
    }

    errors.into_result()
}

pub fn validate_schedule_draft(
    draft: &ScheduleDraft,
    enrolled: &[Course],
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.start_time.trim().is_empty()
        || draft.end_time.trim().is_empty()
        || draft.location.trim().is_empty()
    {
        errors.add("form", "Please fill in all required fields");
    } else {
        errors.check("end_time", validate_time_range(&draft.start_time, &draft.end_time));
    }

    if draft.is_personal {
        if draft.title.trim().is_empty() {
            errors.add("title", "Please enter a title for your personal event");
        }
    } else if draft.course_code.is_empty() {
        errors.add(
            "course_code",
            "Please select a course or mark this as a personal event",
        );
    } else if !enrolled.iter().any(|c| c.code == draft.course_code) {
        errors.add("course_code", "You are not enrolled in this course");
    }

    errors.into_result()
}
