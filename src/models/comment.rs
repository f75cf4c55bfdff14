// src/models/comment.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::AuthorRef;

/// A comment on a community post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author: AuthorRef,
    pub content: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new comment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Comment must be between 1 and 1000 characters"
    ))]
    pub content: String,
}
