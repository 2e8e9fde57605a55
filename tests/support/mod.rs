#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use studyflow::config::ClientConfig;
use studyflow::db;
use studyflow::models::{Session, User};
use studyflow::remote::HttpApi;
use studyflow::state::AppState;

pub const TOKEN: &str = "test-token";
pub const WRITE_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

/// In-process stand-in for the StudyFlow backend.
#[derive(Default)]
pub struct MockBackend {
    pub requests: Mutex<Vec<Recorded>>,
    pub enrolled: Mutex<Vec<Value>>,
    pub created_assignments: Mutex<Vec<Value>>,
    pub assignment_updates: Mutex<Vec<(String, Value)>>,
    pub manual_entries: Mutex<Vec<HashMap<String, String>>>,
    pub added_slots: Mutex<Vec<(String, Value)>>,
    pub chat_messages: Mutex<Vec<String>>,
    pub chat_files: Mutex<Vec<UploadedFile>>,
    /// Every authenticated route answers 401.
    pub reject_token: AtomicBool,
    pub fail_conflicts: AtomicBool,
    /// Writes answer only after `WRITE_DELAY`.
    pub slow_writes: AtomicBool,
}

impl MockBackend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn seed_enrolled(&self, courses: &[Value]) {
        *self.enrolled.lock().unwrap() = courses.to_vec();
    }

    pub fn reject_tokens(&self) {
        self.reject_token.store(true, Ordering::SeqCst);
    }

    pub fn slow_down_writes(&self) {
        self.slow_writes.store(true, Ordering::SeqCst);
    }

    async fn write_delay(&self) {
        if self.slow_writes.load(Ordering::SeqCst) {
            tokio::time::sleep(WRITE_DELAY).await;
        }
    }
}

pub async fn spawn_backend() -> (String, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::default());
    let app = router(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend crashed");
    });

    (format!("http://{}", addr), backend)
}

/// Address nothing listens on: the port is bound once and released.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn api_for(url: &str) -> Arc<HttpApi> {
    let config = ClientConfig::new(url).expect("config");
    Arc::new(HttpApi::new(&config).expect("client"))
}

pub async fn app_state(url: &str) -> AppState {
    let pool = db::connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");
    AppState::new(api_for(url), pool)
}

pub async fn signed_in_state(url: &str) -> AppState {
    let mut state = app_state(url).await;
    state
        .sign_in(Session {
            token: TOKEN.to_string(),
            user: test_user("jdoe@uottawa.ca", "Jane Doe"),
        })
        .await
        .expect("sign in");
    state
}

pub fn test_user(email: &str, full_name: &str) -> User {
    User {
        id: "u-1".to_string(),
        email: email.to_string(),
        full_name: full_name.to_string(),
        student_id: None,
        enrolled_courses: Vec::new(),
        created_at: None,
    }
}

pub fn catalog_course(code: &str, title: &str) -> Value {
    json!({
        "code": code,
        "title": title,
        "subject": &code[..3],
        "number": &code[3..],
        "credits": 3.0,
        "description": format!("{} description", title),
        "prerequisites": null,
        "term": "Fall 2025"
    })
}

fn catalog() -> Vec<Value> {
    vec![
        catalog_course("CSI2110", "Data Structures and Algorithms"),
        catalog_course("CSI2132", "Databases I"),
        catalog_course("MAT1341", "Introduction to Linear Algebra"),
    ]
}

fn assignment(id: i64, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "Implement a heap",
        "course_code": "CSI2110",
        "due_date": "2030-01-15T23:59:59",
        "priority": "high",
        "status": status,
        "created_at": "2025-09-01T12:00:00",
        "estimated_hours": 3.0
    })
}

fn router(backend: Arc<MockBackend>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/courses/all", get(all_courses))
        .route("/courses/search", get(search_courses))
        .route("/courses/subjects", get(subjects))
        .route("/courses/subject/{subject}", get(courses_by_subject))
        .route("/user/courses", get(enrolled_courses))
        .route("/user/enroll/{code}", post(enroll))
        .route("/user/unenroll/{code}", delete(unenroll))
        .route("/assignments", get(list_assignments).post(create_assignment))
        .route("/assignments/summary/stats", get(assignment_stats))
        .route(
            "/assignments/{id}",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
        .route("/schedule", get(schedule))
        .route("/schedule/conflicts", get(conflicts))
        .route("/schedule/manual", post(manual_entry))
        .route("/schedule/{code}/slot", post(add_slot).delete(remove_slot))
        .route("/ai/chat", post(chat))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

fn header(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn record(State(backend): State<Arc<MockBackend>>, req: Request, next: Next) -> Response {
    let recorded = Recorded {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().map(str::to_string),
        authorization: header(req.headers(), AUTHORIZATION),
        content_type: header(req.headers(), CONTENT_TYPE),
    };
    backend.requests.lock().unwrap().push(recorded);
    next.run(req).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn check_token(backend: &MockBackend, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", TOKEN);
    if backend.reject_token.load(Ordering::SeqCst)
        || header(headers, AUTHORIZATION).as_deref() != Some(expected.as_str())
    {
        return Err(detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"));
    }
    Ok(())
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "wrongpass" {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect email or password");
    }
    Json(json!({
        "access_token": TOKEN,
        "token_type": "bearer",
        "user": {
            "id": "u-1",
            "email": body["email"],
            "full_name": "Jane Doe",
            "student_id": "300123456",
            "enrolled_courses": []
        }
    }))
    .into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@uottawa.ca" {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    Json(json!({
        "access_token": TOKEN,
        "token_type": "bearer",
        "user": {
            "id": "u-2",
            "email": body["email"],
            "full_name": body["full_name"],
            "student_id": body["student_id"],
            "enrolled_courses": []
        }
    }))
    .into_response()
}

async fn logout() -> Response {
    Json(json!({ "message": "Successfully logged out" })).into_response()
}

async fn me(State(backend): State<Arc<MockBackend>>, headers: HeaderMap) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    Json(json!({
        "id": "u-1",
        "email": "jdoe@uottawa.ca",
        "full_name": "Jane Q. Doe",
        "student_id": "300123456",
        "enrolled_courses": ["CSI2110"]
    }))
    .into_response()
}

async fn all_courses(Query(params): Query<HashMap<String, String>>) -> Response {
    let courses = catalog();
    Json(json!({
        "courses": courses,
        "total_available": courses.len(),
        "limit": params.get("limit").and_then(|l| l.parse::<u32>().ok())
    }))
    .into_response()
}

async fn search_courses(Query(params): Query<HashMap<String, String>>) -> Response {
    let q = params.get("q").cloned().unwrap_or_default().to_lowercase();
    let subject = params.get("subject").cloned();
    let courses: Vec<Value> = catalog()
        .into_iter()
        .filter(|c| {
            let code = c["code"].as_str().unwrap_or_default().to_lowercase();
            let title = c["title"].as_str().unwrap_or_default().to_lowercase();
            code.contains(&q) || title.contains(&q)
        })
        .filter(|c| subject.as_deref().is_none_or(|s| c["subject"] == s))
        .collect();
    Json(json!({
        "courses": courses,
        "count": courses.len(),
        "total_matches": courses.len()
    }))
    .into_response()
}

async fn subjects() -> Response {
    Json(json!({ "subjects": ["CSI", "MAT"], "count": 2 })).into_response()
}

async fn courses_by_subject(Path(subject): Path<String>) -> Response {
    let courses: Vec<Value> = catalog()
        .into_iter()
        .filter(|c| c["subject"] == subject.as_str())
        .collect();
    Json(json!({
        "subject": subject,
        "courses": courses,
        "total_available": courses.len()
    }))
    .into_response()
}

async fn enrolled_courses(State(backend): State<Arc<MockBackend>>, headers: HeaderMap) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    let courses = backend.enrolled.lock().unwrap().clone();
    Json(json!({ "enrolled_courses": courses, "count": courses.len() })).into_response()
}

async fn enroll(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    let mut enrolled = backend.enrolled.lock().unwrap();
    if enrolled.iter().any(|c| c["code"] == code.as_str()) {
        return detail(StatusCode::BAD_REQUEST, "Already enrolled in this course");
    }
    let Some(course) = catalog().into_iter().find(|c| c["code"] == code.as_str()) else {
        return detail(StatusCode::NOT_FOUND, "Course not found");
    };
    enrolled.push(course);
    Json(json!({ "message": format!("Successfully enrolled in {}", code) })).into_response()
}

async fn unenroll(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    backend
        .enrolled
        .lock()
        .unwrap()
        .retain(|c| c["code"] != code.as_str());
    Json(json!({ "message": format!("Successfully unenrolled from {}", code) })).into_response()
}

async fn list_assignments(State(backend): State<Arc<MockBackend>>, headers: HeaderMap) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    Json(json!([
        assignment(1, "Heap lab", "pending"),
        assignment(2, "Graph homework", "completed")
    ]))
    .into_response()
}

async fn get_assignment(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    match id.parse::<i64>() {
        Ok(1) => Json(assignment(1, "Heap lab", "pending")).into_response(),
        _ => detail(StatusCode::NOT_FOUND, "Assignment not found"),
    }
}

async fn create_assignment(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    backend.write_delay().await;
    backend.created_assignments.lock().unwrap().push(body.clone());
    let mut created = body;
    created["id"] = json!(42);
    created["status"] = json!("pending");
    created["created_at"] = json!("2025-10-01T09:00:00");
    Json(created).into_response()
}

async fn update_assignment(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    backend.write_delay().await;
    backend
        .assignment_updates
        .lock()
        .unwrap()
        .push((id.clone(), body.clone()));
    let mut updated = assignment(id.parse().unwrap_or(0), "Heap lab", "pending");
    if let Some(status) = body.get("status") {
        updated["status"] = status.clone();
    }
    Json(updated).into_response()
}

async fn delete_assignment(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    backend.write_delay().await;
    Json(json!({ "message": format!("Assignment {} deleted", id) })).into_response()
}

async fn assignment_stats(State(backend): State<Arc<MockBackend>>, headers: HeaderMap) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    Json(json!({
        "total": 4,
        "pending": 2,
        "in_progress": 1,
        "completed": 1,
        "overdue": 1,
        "due_today": 0,
        "due_this_week": 2
    }))
    .into_response()
}

async fn schedule(State(backend): State<Arc<MockBackend>>, headers: HeaderMap) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    Json(json!({
        "schedule": [{
            "course_code": "CSI2110",
            "course_title": "Data Structures and Algorithms",
            "color": "purple",
            "time_slots": [
                {"day": "Monday", "start_time": "10:00", "end_time": "11:30", "location": "CRX C140", "type": "Lecture"},
                {"day": "Wednesday", "start_time": "08:30", "end_time": "10:00", "location": "STE 2060", "type": "Lab"}
            ],
            "is_personal": false
        }],
        "total_courses": 1,
        "total_hours_per_week": 3.0
    }))
    .into_response()
}

async fn conflicts(State(backend): State<Arc<MockBackend>>, headers: HeaderMap) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    if backend.fail_conflicts.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "conflict check failed");
    }
    Json(json!({
        "conflicts": [{"course1": "CSI2110", "course2": "MAT1341", "day": "Monday"}]
    }))
    .into_response()
}

async fn manual_entry(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    backend.write_delay().await;
    let mut fields = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap_or_default();
        fields.insert(name, value);
    }
    backend.manual_entries.lock().unwrap().push(fields);
    Json(json!({ "message": "Schedule entry added" })).into_response()
}

async fn add_slot(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    Path(code): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    backend.write_delay().await;
    backend.added_slots.lock().unwrap().push((code, body));
    Json(json!({ "message": "Time slot added" })).into_response()
}

async fn remove_slot(
    State(backend): State<Arc<MockBackend>>,
    headers: HeaderMap,
    Path(_code): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(res) = check_token(&backend, &headers) {
        return res;
    }
    if !params.contains_key("day") || !params.contains_key("start_time") {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "day and start_time are required");
    }
    Json(json!({ "message": "Time slot removed" })).into_response()
}

async fn chat(State(backend): State<Arc<MockBackend>>, mut multipart: Multipart) -> Response {
    let mut message = String::new();
    let mut file_name = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "message" => message = field.text().await.unwrap_or_default(),
            "file" => {
                let name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
                file_name = Some(name.clone());
                backend.chat_files.lock().unwrap().push(UploadedFile {
                    name,
                    content_type,
                    size,
                });
            }
            _ => {}
        }
    }
    backend.chat_messages.lock().unwrap().push(message.clone());

    let response = if message == "silent" {
        String::new()
    } else {
        format!("You said: {}", message)
    };
    Json(json!({
        "response": response,
        "file_uploaded": file_name,
        "service": "mock"
    }))
    .into_response()
}
