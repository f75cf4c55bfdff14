// src/models/user.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user as listed by the backend admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    pub username: String,

    /// User role: 'student', 'teacher' or 'admin'.
    pub role: String,

    #[serde(default)]
    pub is_verified: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Author reference embedded in posts and comments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: i64,
    pub username: String,
}

/// DTO for user login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Body returned by the backend on successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub is_verified: bool,
}
