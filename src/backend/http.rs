// src/backend/http.rs

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use super::Backend;
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

/// Error body returned by the backend.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct LikeResponse {
    liked: bool,
}

#[derive(Serialize)]
struct IdsQuery {
    ids: String,
}

/// `Backend` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and turns non-2xx statuses into `AppError`s.
    async fn send(builder: RequestBuilder) -> Result<Response, AppError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&raw)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });
        tracing::warn!("Backend responded {}: {}", status, message);
        Err(AppError::from_backend_status(status, message))
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, AppError> {
        let response = Self::send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Upstream(format!("undecodable backend payload: {}", e)))
    }

    async fn empty(builder: RequestBuilder) -> Result<(), AppError> {
        Self::send(builder).await.map(|_| ())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        Self::json(self.request(Method::POST, "auth/login", None).json(req)).await
    }

    async fn fetch_attempts(
        &self,
        token: &str,
        window: TimeWindow,
    ) -> Result<Vec<QuizAttempt>, AppError> {
        Self::json(
            self.request(Method::GET, "attempts", Some(token))
                .query(&window),
        )
        .await
    }

    async fn fetch_questions(
        &self,
        token: &str,
        ids: &[i64],
    ) -> Result<HashMap<i64, Question>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let query = IdsQuery {
            ids: ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(","),
        };
        let questions: Vec<Question> =
            Self::json(self.request(Method::GET, "questions", Some(token)).query(&query)).await?;
        Ok(questions.into_iter().map(|q| (q.id, q)).collect())
    }

    async fn list_questions(
        &self,
        token: &str,
        params: &QuestionListParams,
    ) -> Result<Vec<Question>, AppError> {
        Self::json(self.request(Method::GET, "questions", Some(token)).query(params)).await
    }

    async fn create_question(
        &self,
        token: &str,
        req: &CreateQuestionRequest,
    ) -> Result<Question, AppError> {
        Self::json(self.request(Method::POST, "questions", Some(token)).json(req)).await
    }

    async fn update_question(
        &self,
        token: &str,
        id: i64,
        req: &CreateQuestionRequest,
    ) -> Result<Question, AppError> {
        let path = format!("questions/{}", id);
        Self::json(self.request(Method::PUT, &path, Some(token)).json(req)).await
    }

    async fn delete_question(&self, token: &str, id: i64) -> Result<(), AppError> {
        let path = format!("questions/{}", id);
        Self::empty(self.request(Method::DELETE, &path, Some(token))).await
    }

    async fn list_tags(&self, token: &str, params: &TagListParams) -> Result<Vec<Tag>, AppError> {
        Self::json(self.request(Method::GET, "tags", Some(token)).query(params)).await
    }

    async fn create_tag(&self, token: &str, req: &CreateTagRequest) -> Result<Tag, AppError> {
        Self::json(self.request(Method::POST, "tags", Some(token)).json(req)).await
    }

    async fn delete_tag(&self, token: &str, id: i64) -> Result<(), AppError> {
        let path = format!("tags/{}", id);
        Self::empty(self.request(Method::DELETE, &path, Some(token))).await
    }

    async fn list_quizzes(&self, token: &str) -> Result<Vec<QuizSummary>, AppError> {
        Self::json(self.request(Method::GET, "quizzes", Some(token))).await
    }

    async fn get_quiz(&self, token: &str, id: i64) -> Result<Quiz, AppError> {
        let path = format!("quizzes/{}", id);
        Self::json(self.request(Method::GET, &path, Some(token))).await
    }

    async fn create_quiz(&self, token: &str, quiz: &Quiz) -> Result<Quiz, AppError> {
        Self::json(self.request(Method::POST, "quizzes", Some(token)).json(quiz)).await
    }

    async fn update_quiz(&self, token: &str, id: i64, quiz: &Quiz) -> Result<Quiz, AppError> {
        let path = format!("quizzes/{}", id);
        Self::json(self.request(Method::PUT, &path, Some(token)).json(quiz)).await
    }

    async fn delete_quiz(&self, token: &str, id: i64) -> Result<(), AppError> {
        let path = format!("quizzes/{}", id);
        Self::empty(self.request(Method::DELETE, &path, Some(token))).await
    }

    async fn list_posts(
        &self,
        token: &str,
        params: &PostListParams,
    ) -> Result<Vec<CommunityPost>, AppError> {
        Self::json(self.request(Method::GET, "posts", Some(token)).query(params)).await
    }

    async fn get_post(&self, token: &str, id: i64) -> Result<CommunityPost, AppError> {
        let path = format!("posts/{}", id);
        Self::json(self.request(Method::GET, &path, Some(token))).await
    }

    async fn create_post(
        &self,
        token: &str,
        req: &CreatePostRequest,
    ) -> Result<CommunityPost, AppError> {
        Self::json(self.request(Method::POST, "posts", Some(token)).json(req)).await
    }

    async fn delete_post(&self, token: &str, id: i64) -> Result<(), AppError> {
        let path = format!("posts/{}", id);
        Self::empty(self.request(Method::DELETE, &path, Some(token))).await
    }

    async fn list_comments(&self, token: &str, post_id: i64) -> Result<Vec<Comment>, AppError> {
        let path = format!("posts/{}/comments", post_id);
        Self::json(self.request(Method::GET, &path, Some(token))).await
    }

    async fn create_comment(
        &self,
        token: &str,
        post_id: i64,
        req: &CreateCommentRequest,
    ) -> Result<Comment, AppError> {
        let path = format!("posts/{}/comments", post_id);
        Self::json(self.request(Method::POST, &path, Some(token)).json(req)).await
    }

    async fn toggle_like(&self, token: &str, post_id: i64) -> Result<bool, AppError> {
        let path = format!("posts/{}/like", post_id);
        let resp: LikeResponse = Self::json(self.request(Method::POST, &path, Some(token))).await?;
        Ok(resp.liked)
    }

    async fn report_post(
        &self,
        token: &str,
        post_id: i64,
        req: &ReportRequest,
    ) -> Result<(), AppError> {
        let path = format!("posts/{}/report", post_id);
        Self::empty(self.request(Method::POST, &path, Some(token)).json(req)).await
    }

    async fn list_users(&self, token: &str) -> Result<Vec<User>, AppError> {
        Self::json(self.request(Method::GET, "users", Some(token))).await
    }
}
