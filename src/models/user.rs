use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// First word of the full name, used in greetings.
    pub fn first_name(&self) -> &str {
        self.full_name.split_whitespace().next().unwrap_or("Student")
    }
}

/// A bearer token and the user it authorizes. Persisted as a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Empty when the student leaves the optional field blank.
    #[serde(default)]
    pub student_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub student_id: Option<String>,
}

impl From<&RegisterForm> for RegisterRequest {
    fn from(form: &RegisterForm) -> Self {
        Self {
            email: form.email.clone(),
            password: form.password.clone(),
            full_name: form.full_name.clone(),
            student_id: Some(form.student_id.clone()).filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

impl From<AuthResponse> for Session {
    fn from(res: AuthResponse) -> Self {
        Session {
            token: res.access_token,
            user: res.user,
        }
    }
}
