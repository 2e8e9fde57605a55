pub mod dto;

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::AppError;
use crate::models::{
    Assignment, AssignmentFilter, AssignmentStats, AuthResponse, CatalogCourse, ChatAttachment,
    ChatReply, DayOfWeek, LoginForm, ManualScheduleEntry, NewAssignment, RegisterRequest,
    Schedule, ScheduleConflict, TimeSlot, UpdateAssignment, User,
};

/// Typed view of the StudyFlow backend. Every failure is either an
/// application error (`Api`/`Unauthorized`) or `Unreachable`.
#[async_trait]
pub trait StudyFlowApi: Send + Sync {
    /// Token attached as `Authorization: Bearer` on subsequent calls.
    fn set_token(&self, token: Option<String>);

    async fn login(&self, credentials: &LoginForm) -> Result<AuthResponse, AppError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError>;
    async fn logout(&self) -> Result<(), AppError>;
    async fn current_user(&self) -> Result<User, AppError>;

    async fn list_courses(&self, limit: u32) -> Result<Vec<CatalogCourse>, AppError>;
    async fn search_courses(
        &self,
        query: Option<&str>,
        subject: Option<&str>,
        limit: u32,
    ) -> Result<Vec<CatalogCourse>, AppError>;
    async fn list_subjects(&self) -> Result<Vec<String>, AppError>;
    async fn courses_by_subject(&self, subject: &str, limit: u32) -> Result<Vec<CatalogCourse>, AppError>;

    async fn enrolled_courses(&self) -> Result<Vec<CatalogCourse>, AppError>;
    async fn enroll(&self, course_code: &str) -> Result<(), AppError>;
    async fn unenroll(&self, course_code: &str) -> Result<(), AppError>;

    async fn list_assignments(&self, filter: &AssignmentFilter) -> Result<Vec<Assignment>, AppError>;
    async fn get_assignment(&self, id: &str) -> Result<Assignment, AppError>;
    async fn create_assignment(&self, assignment: &NewAssignment) -> Result<Assignment, AppError>;
    async fn update_assignment(&self, id: &str, update: &UpdateAssignment) -> Result<Assignment, AppError>;
    async fn delete_assignment(&self, id: &str) -> Result<(), AppError>;
    async fn assignment_stats(&self) -> Result<AssignmentStats, AppError>;

    async fn schedule(&self) -> Result<Schedule, AppError>;
    async fn schedule_conflicts(&self) -> Result<Vec<ScheduleConflict>, AppError>;
    async fn add_manual_entry(&self, entry: &ManualScheduleEntry) -> Result<(), AppError>;
    async fn add_time_slot(&self, course_code: &str, slot: &TimeSlot) -> Result<(), AppError>;
    async fn remove_time_slot(
        &self,
        course_code: &str,
        day: DayOfWeek,
        start_time: &str,
    ) -> Result<(), AppError>;

    async fn chat(&self, message: &str, attachment: Option<&ChatAttachment>) -> Result<ChatReply, AppError>;
}

pub struct HttpApi {
    client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            token: RwLock::new(None),
        })
    }

    /// Appends path segments to the base url, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::Config(format!("{} cannot be a base url", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn endpoint_with_query(
        &self,
        segments: &[&str],
        pairs: &[(&str, String)],
    ) -> Result<Url, AppError> {
        let mut url = self.endpoint(segments)?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        let builder = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        self.authorize(builder)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, AppError> {
        let response = builder.send().await.map_err(|e| {
            warn!("backend request failed: {}", e);
            AppError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("backend responded {}: {}", status, body);
            return Err(AppError::from_status(status.as_u16(), &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, AppError> {
        self.send(self.request(Method::GET, url)).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<T, AppError> {
        self.send(self.request(method, url).json(body)).await
    }

    async fn send_empty(&self, method: Method, url: Url) -> Result<(), AppError> {
        let ack: dto::MessageResponse = self.send(self.request(method, url)).await?;
        if let Some(message) = ack.message {
            debug!("backend: {}", message);
        }
        Ok(())
    }

    async fn send_form<T: DeserializeOwned>(&self, url: Url, form: Form) -> Result<T, AppError> {
        debug!("POST {} (multipart)", url);
        let builder = self.authorize(self.client.post(url).multipart(form));
        self.send(builder).await
    }
}

#[async_trait]
impl StudyFlowApi for HttpApi {
    fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut slot) => *slot = token,
            Err(_) => warn!("token lock poisoned; keeping previous token"),
        }
    }

    async fn login(&self, credentials: &LoginForm) -> Result<AuthResponse, AppError> {
        let url = self.endpoint(&["auth", "login"])?;
        self.send_json(Method::POST, url, credentials).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
        let url = self.endpoint(&["auth", "register"])?;
        self.send_json(Method::POST, url, request).await
    }

    async fn logout(&self) -> Result<(), AppError> {
        let url = self.endpoint(&["auth", "logout"])?;
        self.send_empty(Method::POST, url).await
    }

    async fn current_user(&self) -> Result<User, AppError> {
        let url = self.endpoint(&["auth", "me"])?;
        self.get(url).await
    }

    async fn list_courses(&self, limit: u32) -> Result<Vec<CatalogCourse>, AppError> {
        let url = self.endpoint_with_query(&["courses", "all"], &[("limit", limit.to_string())])?;
        let res: dto::CourseListResponse = self.get(url).await?;
        Ok(res.courses)
    }

    async fn search_courses(
        &self,
        query: Option<&str>,
        subject: Option<&str>,
        limit: u32,
    ) -> Result<Vec<CatalogCourse>, AppError> {
        let mut pairs = Vec::new();
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(s) = subject.filter(|s| !s.is_empty()) {
            pairs.push(("subject", s.to_string()));
        }
        pairs.push(("limit", limit.to_string()));

        let url = self.endpoint_with_query(&["courses", "search"], &pairs)?;
        let res: dto::CourseListResponse = self.get(url).await?;
        debug!(
            "search matched {} courses",
            res.total_matches.unwrap_or(res.courses.len() as u32)
        );
        Ok(res.courses)
    }

    async fn list_subjects(&self) -> Result<Vec<String>, AppError> {
        let url = self.endpoint(&["courses", "subjects"])?;
        let res: dto::SubjectsResponse = self.get(url).await?;
        Ok(res.subjects)
    }

    async fn courses_by_subject(&self, subject: &str, limit: u32) -> Result<Vec<CatalogCourse>, AppError> {
        let url = self.endpoint_with_query(
            &["courses", "subject", subject],
            &[("limit", limit.to_string())],
        )?;
        let res: dto::CourseListResponse = self.get(url).await?;
        Ok(res.courses)
    }

    async fn enrolled_courses(&self) -> Result<Vec<CatalogCourse>, AppError> {
        let url = self.endpoint(&["user", "courses"])?;
        let res: dto::EnrolledCoursesResponse = self.get(url).await?;
        Ok(res.enrolled_courses)
    }

    async fn enroll(&self, course_code: &str) -> Result<(), AppError> {
        let url = self.endpoint(&["user", "enroll", course_code])?;
        self.send_empty(Method::POST, url).await
    }

    async fn unenroll(&self, course_code: &str) -> Result<(), AppError> {
        let url = self.endpoint(&["user", "unenroll", course_code])?;
        self.send_empty(Method::DELETE, url).await
    }

    async fn list_assignments(&self, filter: &AssignmentFilter) -> Result<Vec<Assignment>, AppError> {
        let url = self.endpoint_with_query(&["assignments"], &filter.query_pairs())?;
        self.get(url).await
    }

    async fn get_assignment(&self, id: &str) -> Result<Assignment, AppError> {
        let url = self.endpoint(&["assignments", id])?;
        self.get(url).await
    }

    async fn create_assignment(&self, assignment: &NewAssignment) -> Result<Assignment, AppError> {
        let url = self.endpoint(&["assignments"])?;
        self.send_json(Method::POST, url, assignment).await
    }

    async fn update_assignment(&self, id: &str, update: &UpdateAssignment) -> Result<Assignment, AppError> {
        let url = self.endpoint(&["assignments", id])?;
        self.send_json(Method::PUT, url, update).await
    }

    async fn delete_assignment(&self, id: &str) -> Result<(), AppError> {
        let url = self.endpoint(&["assignments", id])?;
        self.send_empty(Method::DELETE, url).await
    }

    async fn assignment_stats(&self) -> Result<AssignmentStats, AppError> {
        let url = self.endpoint(&["assignments", "summary", "stats"])?;
        self.get(url).await
    }

    async fn schedule(&self) -> Result<Schedule, AppError> {
        let url = self.endpoint(&["schedule"])?;
        self.get(url).await
    }

    async fn schedule_conflicts(&self) -> Result<Vec<ScheduleConflict>, AppError> {
        let url = self.endpoint(&["schedule", "conflicts"])?;
        let res: dto::ConflictsResponse = self.get(url).await?;
        Ok(res.conflicts)
    }

    async fn add_manual_entry(&self, entry: &ManualScheduleEntry) -> Result<(), AppError> {
        let url = self.endpoint(&["schedule", "manual"])?;
        let form = entry
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        let _: dto::MessageResponse = self.send_form(url, form).await?;
        Ok(())
    }

    async fn add_time_slot(&self, course_code: &str, slot: &TimeSlot) -> Result<(), AppError> {
        let url = self.endpoint(&["schedule", course_code, "slot"])?;
        let _: dto::MessageResponse = self.send_json(Method::POST, url, slot).await?;
        Ok(())
    }

    async fn remove_time_slot(
        &self,
        course_code: &str,
        day: DayOfWeek,
        start_time: &str,
    ) -> Result<(), AppError> {
        let url = self.endpoint_with_query(
            &["schedule", course_code, "slot"],
            &[
                ("day", day.as_str().to_string()),
                ("start_time", start_time.to_string()),
            ],
        )?;
        self.send_empty(Method::DELETE, url).await
    }

    async fn chat(&self, message: &str, attachment: Option<&ChatAttachment>) -> Result<ChatReply, AppError> {
        let url = self.endpoint(&["ai", "chat"])?;
        let mut form = Form::new().text("message", message.to_string());
        if let Some(file) = attachment {
            let part = Part::bytes(file.bytes().to_vec())
                .file_name(file.file_name().to_string())
                .mime_str(file.mime_type())?;
            form = form.part("file", part);
        }
        self.send_form(url, form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpApi {
        HttpApi::new(&ClientConfig::new(base).expect("config")).expect("client")
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let api = api("http://localhost:8000");
        let url = api.endpoint(&["user", "enroll", "CSI 2110"]).expect("url");
        assert_eq!(url.as_str(), "http://localhost:8000/user/enroll/CSI%202110");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let api = api("https://studyflow.example.com/api/");
        let url = api.endpoint(&["schedule", "conflicts"]).expect("url");
        assert_eq!(url.as_str(), "https://studyflow.example.com/api/schedule/conflicts");
    }

    #[test]
    fn test_query_pairs_are_encoded() {
        let api = api("http://localhost:8000");
        let url = api
            .endpoint_with_query(
                &["courses", "search"],
                &[("q", "data & algo".to_string()), ("limit", "100".to_string())],
            )
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/courses/search?q=data+%26+algo&limit=100"
        );
    }

    #[test]
    fn test_token_can_be_set_and_cleared() {
        let api = api("http://localhost:8000");
        assert_eq!(api.token(), None);
        api.set_token(Some("abc".to_string()));
        assert_eq!(api.token().as_deref(), Some("abc"));
        api.set_token(None);
        assert_eq!(api.token(), None);
    }
}
