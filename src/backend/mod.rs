// src/backend/mod.rs

//! Contract with the external REST backend that owns all persistent data.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        attempt::{QuizAttempt, TimeWindow},
        comment::{Comment, CreateCommentRequest},
        post::{CommunityPost, CreatePostRequest, PostListParams, ReportRequest},
        question::{CreateQuestionRequest, Question, QuestionListParams},
        quiz::{Quiz, QuizSummary},
        tag::{CreateTagRequest, Tag, TagListParams},
        user::{LoginRequest, LoginResponse, User},
    },
};

pub mod http;

pub use http::HttpBackend;

/// Every call except `login` carries the session's bearer token.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError>;

    /// Attempts of the token's user, optionally restricted to a window.
    async fn fetch_attempts(
        &self,
        token: &str,
        window: TimeWindow,
    ) -> Result<Vec<QuizAttempt>, AppError>;

    /// Question metadata for a batch of ids. Unknown ids are absent from the map.
    async fn fetch_questions(
        &self,
        token: &str,
        ids: &[i64],
    ) -> Result<HashMap<i64, Question>, AppError>;

    async fn list_questions(
        &self,
        token: &str,
        params: &QuestionListParams,
    ) -> Result<Vec<Question>, AppError>;
    async fn create_question(
        &self,
        token: &str,
        req: &CreateQuestionRequest,
    ) -> Result<Question, AppError>;
    async fn update_question(
        &self,
        token: &str,
        id: i64,
        req: &CreateQuestionRequest,
    ) -> Result<Question, AppError>;
    async fn delete_question(&self, token: &str, id: i64) -> Result<(), AppError>;

    async fn list_tags(&self, token: &str, params: &TagListParams) -> Result<Vec<Tag>, AppError>;
    async fn create_tag(&self, token: &str, req: &CreateTagRequest) -> Result<Tag, AppError>;
    async fn delete_tag(&self, token: &str, id: i64) -> Result<(), AppError>;

    async fn list_quizzes(&self, token: &str) -> Result<Vec<QuizSummary>, AppError>;
    async fn get_quiz(&self, token: &str, id: i64) -> Result<Quiz, AppError>;
    async fn create_quiz(&self, token: &str, quiz: &Quiz) -> Result<Quiz, AppError>;
    async fn update_quiz(&self, token: &str, id: i64, quiz: &Quiz) -> Result<Quiz, AppError>;
    async fn delete_quiz(&self, token: &str, id: i64) -> Result<(), AppError>;

    async fn list_posts(
        &self,
        token: &str,
        params: &PostListParams,
    ) -> Result<Vec<CommunityPost>, AppError>;
    async fn get_post(&self, token: &str, id: i64) -> Result<CommunityPost, AppError>;
    async fn create_post(
        &self,
        token: &str,
        req: &CreatePostRequest,
    ) -> Result<CommunityPost, AppError>;
    async fn delete_post(&self, token: &str, id: i64) -> Result<(), AppError>;
    async fn list_comments(&self, token: &str, post_id: i64) -> Result<Vec<Comment>, AppError>;
    async fn create_comment(
        &self,
        token: &str,
        post_id: i64,
        req: &CreateCommentRequest,
    ) -> Result<Comment, AppError>;
    /// Returns whether the post is liked after the toggle.
    async fn toggle_like(&self, token: &str, post_id: i64) -> Result<bool, AppError>;
    async fn report_post(
        &self,
        token: &str,
        post_id: i64,
        req: &ReportRequest,
    ) -> Result<(), AppError>;

    async fn list_users(&self, token: &str) -> Result<Vec<User>, AppError>;
}
