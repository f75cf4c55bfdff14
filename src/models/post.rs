// src/models/post.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::comment::Comment;
use crate::models::user::AuthorRef;

/// A community discussion post as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: AuthorRef,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub likes_count: i64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title length must be between 1 and 100 chars"
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 10000,
        message = "Content length must be between 1 and 10000 chars"
    ))]
    pub content: String,

    #[serde(default)]
    #[validate(custom(function = validate_tags))]
    pub tags: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = validate_attachment_urls))]
    pub attachments: Vec<String>,
}

/// Query parameters for listing posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListParams {
    /// Page number, starting at 1.
    pub page: Option<u32>,

    /// Number of items to return (default: 20, max: 100).
    pub limit: Option<u32>,

    /// Filter by tag.
    pub tag: Option<String>,

    /// Search keyword for title match.
    pub q: Option<String>,
}

/// DTO for flagging a post to moderators.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"))]
    pub reason: String,
}

/// Restricts tags to a small set of short labels.
fn validate_tags(tags: &[String]) -> Result<(), validator::ValidationError> {
    if tags.len() > 10 {
        return Err(validator::ValidationError::new("too_many_tags"));
    }
    if tags.iter().any(|t| t.trim().is_empty() || t.len() > 30) {
        return Err(validator::ValidationError::new("invalid_tag"));
    }
    Ok(())
}

/// Validates a collection of attachment URLs.
fn validate_attachment_urls(urls: &[String]) -> Result<(), validator::ValidationError> {
    for url in urls {
        if url.len() > 500 {
            return Err(validator::ValidationError::new("url_too_long"));
        }
        if url::Url::parse(url).is_err() {
            return Err(validator::ValidationError::new("invalid_url"));
        }
    }
    Ok(())
}
