// tests/common/mod.rs

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicI64, Ordering},
};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use quizdesk::{
    backend::Backend,
    config::Config,
    error::AppError,
    models::{
        attempt::{AnswerRecord, QuizAttempt, QuizRef, TimeWindow},
        comment::{Comment, CreateCommentRequest},
        post::{CommunityPost, CreatePostRequest, PostListParams, ReportRequest},
        question::{CreateQuestionRequest, Difficulty, Question, QuestionListParams, QuestionTags},
        quiz::{Quiz, QuizSummary},
        tag::{CreateTagRequest, Tag, TagListParams},
        user::{AuthorRef, LoginRequest, LoginResponse, User},
    },
    routes,
    session::{MemorySessionStore, SessionManager},
    state::{AppState, LatestSlot},
    utils::jwt::Claims,
};

pub const PASSWORD: &str = "password123";

/// In-memory stand-in for the REST backend.
#[derive(Default)]
pub struct MemoryBackend {
    pub questions: Mutex<HashMap<i64, Question>>,
    pub attempts: Mutex<Vec<QuizAttempt>>,
    pub quizzes: Mutex<Vec<Quiz>>,
    pub posts: Mutex<Vec<CommunityPost>>,
    pub reports: Mutex<Vec<(i64, String)>>,
    pub tags: Mutex<Vec<Tag>>,
    pub fail_attempts: AtomicBool,
    pub fail_questions: AtomicBool,
    next_id: AtomicI64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.next_id.store(1000, Ordering::SeqCst);
        backend
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    pub fn add_question(&self, id: i64, subject: &str, difficulty: Difficulty) {
        let question = Question {
            id,
            text: format!("Question {}", id),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answers: vec!["A".into()],
            explanation: None,
            tags: QuestionTags {
                subject: Some(subject.to_string()),
                difficulty_level: Some(difficulty),
                ..QuestionTags::default()
            },
        };
        self.questions.lock().unwrap().insert(id, question);
    }

    /// Adds an attempt with `n` answers to `question_id`, the first `correct` right.
    pub fn add_attempt(&self, day: u32, score: f64, question_id: i64, n: usize, correct: usize) {
        let answers = (0..n)
            .map(|i| AnswerRecord {
                question_id,
                selected_answers: vec!["A".into()],
                correct_answers: vec!["A".into()],
                is_correct: i < correct,
            })
            .collect();
        let attempt = QuizAttempt {
            id: self.next_id(),
            quiz: QuizRef {
                id: 1,
                title: format!("Practice {}", day),
            },
            answers,
            score,
            max_score: 100.0,
            submitted_at: Utc.with_ymd_and_hms(2025, 2, day, 9, 0, 0).unwrap(),
        };
        self.attempts.lock().unwrap().push(attempt);
    }

    pub fn add_post(&self, id: i64, author_id: i64, title: &str) {
        self.posts.lock().unwrap().push(CommunityPost {
            id,
            title: title.to_string(),
            content: "content".to_string(),
            author: AuthorRef {
                id: author_id,
                username: format!("user{}", author_id),
            },
            tags: vec![],
            attachments: vec![],
            likes_count: 0,
            comments: vec![],
            created_at: Some(Utc::now()),
            updated_at: None,
        });
    }
}

fn upstream() -> AppError {
    AppError::Upstream("backend offline".to_string())
}

fn not_found(what: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} {} not found", what, id))
}

/// Signs a token the way the backend would. Users named `admin*` get the admin role.
pub fn issue_token(user_id: i64, username: &str) -> String {
    let role = if username.starts_with("admin") { "admin" } else { "student" };
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"backend_secret"),
    )
    .unwrap()
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        if req.password != PASSWORD {
            return Err(AppError::AuthError("Invalid password".to_string()));
        }
        let user_id = if req.username.starts_with("admin") { 1 } else { 7 };
        Ok(LoginResponse {
            token: issue_token(user_id, &req.username),
            is_verified: true,
        })
    }

    async fn fetch_attempts(
        &self,
        _token: &str,
        window: TimeWindow,
    ) -> Result<Vec<QuizAttempt>, AppError> {
        if self.fail_attempts.load(Ordering::SeqCst) {
            return Err(upstream());
        }
        Ok(self
            .attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| window.from.is_none_or(|from| a.submitted_at >= from))
            .filter(|a| window.to.is_none_or(|to| a.submitted_at <= to))
            .cloned()
            .collect())
    }

    async fn fetch_questions(
        &self,
        _token: &str,
        ids: &[i64],
    ) -> Result<HashMap<i64, Question>, AppError> {
        if self.fail_questions.load(Ordering::SeqCst) {
            return Err(upstream());
        }
        let bank = self.questions.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| bank.get(id).map(|q| (*id, q.clone())))
            .collect())
    }

    async fn list_questions(
        &self,
        _token: &str,
        params: &QuestionListParams,
    ) -> Result<Vec<Question>, AppError> {
        let mut list: Vec<Question> = self
            .questions
            .lock()
            .unwrap()
            .values()
            .filter(|q| {
                params
                    .subject
                    .as_deref()
                    .is_none_or(|s| q.tags.subject.as_deref() == Some(s))
            })
            .cloned()
            .collect();
        list.sort_by_key(|q| q.id);
        list.truncate(params.limit.unwrap_or(100) as usize);
        Ok(list)
    }

    async fn create_question(
        &self,
        _token: &str,
        req: &CreateQuestionRequest,
    ) -> Result<Question, AppError> {
        let question = Question {
            id: self.next_id(),
            text: req.text.clone(),
            options: req.options.clone(),
            correct_answers: req.correct_answers.clone(),
            explanation: req.explanation.clone(),
            tags: req.tags.clone(),
        };
        self.questions
            .lock()
            .unwrap()
            .insert(question.id, question.clone());
        Ok(question)
    }

    async fn update_question(
        &self,
        _token: &str,
        id: i64,
        req: &CreateQuestionRequest,
    ) -> Result<Question, AppError> {
        let mut bank = self.questions.lock().unwrap();
        let question = bank.get_mut(&id).ok_or_else(|| not_found("Question", id))?;
        question.text = req.text.clone();
        question.options = req.options.clone();
        question.correct_answers = req.correct_answers.clone();
        question.tags = req.tags.clone();
        Ok(question.clone())
    }

    async fn delete_question(&self, _token: &str, id: i64) -> Result<(), AppError> {
        self.questions
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("Question", id))
    }

    async fn list_tags(&self, _token: &str, params: &TagListParams) -> Result<Vec<Tag>, AppError> {
        Ok(self
            .tags
            .lock()
            .unwrap()
            .iter()
            .filter(|t| params.dimension.is_none_or(|d| t.dimension == d))
            .cloned()
            .collect())
    }

    async fn create_tag(&self, _token: &str, req: &CreateTagRequest) -> Result<Tag, AppError> {
        let mut tags = self.tags.lock().unwrap();
        if tags
            .iter()
            .any(|t| t.dimension == req.dimension && t.name == req.name)
        {
            return Err(AppError::Conflict(format!("Tag '{}' already exists", req.name)));
        }
        let tag = Tag {
            id: self.next_id(),
            dimension: req.dimension,
            name: req.name.clone(),
        };
        tags.push(tag.clone());
        Ok(tag)
    }

    async fn delete_tag(&self, _token: &str, id: i64) -> Result<(), AppError> {
        let mut tags = self.tags.lock().unwrap();
        let before = tags.len();
        tags.retain(|t| t.id != id);
        if tags.len() == before {
            return Err(not_found("Tag", id));
        }
        Ok(())
    }

    async fn list_quizzes(&self, _token: &str) -> Result<Vec<QuizSummary>, AppError> {
        Ok(self
            .quizzes
            .lock()
            .unwrap()
            .iter()
            .map(|q| QuizSummary {
                id: q.id.unwrap_or_default(),
                title: q.title.clone(),
                total_duration: q.total_duration,
                total_marks: q.total_marks,
                schedule: q.schedule.clone(),
                created_at: q.created_at,
            })
            .collect())
    }

    async fn get_quiz(&self, _token: &str, id: i64) -> Result<Quiz, AppError> {
        self.quizzes
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == Some(id))
            .cloned()
            .ok_or_else(|| not_found("Quiz", id))
    }

    async fn create_quiz(&self, _token: &str, quiz: &Quiz) -> Result<Quiz, AppError> {
        let mut stored = quiz.clone();
        stored.id = Some(self.next_id());
        stored.created_at = Some(Utc::now());
        self.quizzes.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update_quiz(&self, _token: &str, id: i64, quiz: &Quiz) -> Result<Quiz, AppError> {
        let mut quizzes = self.quizzes.lock().unwrap();
        let slot = quizzes
            .iter_mut()
            .find(|q| q.id == Some(id))
            .ok_or_else(|| not_found("Quiz", id))?;
        *slot = quiz.clone();
        slot.updated_at = Some(Utc::now());
        Ok(slot.clone())
    }

    async fn delete_quiz(&self, _token: &str, id: i64) -> Result<(), AppError> {
        let mut quizzes = self.quizzes.lock().unwrap();
        let before = quizzes.len();
        quizzes.retain(|q| q.id != Some(id));
        if quizzes.len() == before {
            return Err(not_found("Quiz", id));
        }
        Ok(())
    }

    async fn list_posts(
        &self,
        _token: &str,
        params: &PostListParams,
    ) -> Result<Vec<CommunityPost>, AppError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts
            .iter()
            .rev()
            .take(params.limit.unwrap_or(20) as usize)
            .cloned()
            .collect())
    }

    async fn get_post(&self, _token: &str, id: i64) -> Result<CommunityPost, AppError> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found("Post", id))
    }

    async fn create_post(
        &self,
        token: &str,
        req: &CreatePostRequest,
    ) -> Result<CommunityPost, AppError> {
        let claims = quizdesk::utils::jwt::read_claims(token)?;
        let author_id: i64 = claims.sub.parse().unwrap();
        let post = CommunityPost {
            id: self.next_id(),
            title: req.title.clone(),
            content: req.content.clone(),
            author: AuthorRef {
                id: author_id,
                username: format!("user{}", author_id),
            },
            tags: req.tags.clone(),
            attachments: req.attachments.clone(),
            likes_count: 0,
            comments: vec![],
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn delete_post(&self, _token: &str, id: i64) -> Result<(), AppError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            return Err(not_found("Post", id));
        }
        Ok(())
    }

    async fn list_comments(&self, token: &str, post_id: i64) -> Result<Vec<Comment>, AppError> {
        Ok(self.get_post(token, post_id).await?.comments)
    }

    async fn create_comment(
        &self,
        token: &str,
        post_id: i64,
        req: &CreateCommentRequest,
    ) -> Result<Comment, AppError> {
        let claims = quizdesk::utils::jwt::read_claims(token)?;
        let author_id: i64 = claims.sub.parse().unwrap();
        let comment = Comment {
            id: self.next_id(),
            post_id,
            author: AuthorRef {
                id: author_id,
                username: format!("user{}", author_id),
            },
            content: req.content.clone(),
            created_at: Some(Utc::now()),
        };
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| not_found("Post", post_id))?;
        post.comments.push(comment.clone());
        Ok(comment)
    }

    async fn toggle_like(&self, _token: &str, post_id: i64) -> Result<bool, AppError> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| not_found("Post", post_id))?;
        let liked = post.likes_count == 0;
        post.likes_count = if liked { 1 } else { 0 };
        Ok(liked)
    }

    async fn report_post(
        &self,
        _token: &str,
        post_id: i64,
        req: &ReportRequest,
    ) -> Result<(), AppError> {
        self.reports
            .lock()
            .unwrap()
            .push((post_id, req.reason.clone()));
        Ok(())
    }

    async fn list_users(&self, _token: &str) -> Result<Vec<User>, AppError> {
        Ok(vec![User {
            id: 1,
            username: "admin".to_string(),
            role: "admin".to_string(),
            is_verified: true,
            created_at: None,
        }])
    }
}

pub struct TestApp {
    pub address: String,
    pub backend: Arc<MemoryBackend>,
    pub session: Arc<SessionManager>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Logs in through the API and returns the response status.
    pub async fn login(&self, username: &str) -> u16 {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request")
            .status()
            .as_u16()
    }
}

/// Spawns the app on a random port backed by a fresh `MemoryBackend`.
pub async fn spawn_app() -> TestApp {
    let backend = Arc::new(MemoryBackend::new());
    let store = Arc::new(MemorySessionStore::default());
    let session = Arc::new(SessionManager::init(store).unwrap());

    let config = Config {
        backend_url: url::Url::parse("http://backend.invalid").unwrap(),
        session_file: std::env::temp_dir().join("quizdesk-unused.json"),
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        backend_timeout_secs: 1,
        rust_log: "error".to_string(),
    };

    let state = AppState {
        backend: backend.clone(),
        session: session.clone(),
        config,
        dashboard: Arc::new(LatestSlot::default()),
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        backend,
        session,
        client: reqwest::Client::new(),
    }
}
