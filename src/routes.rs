// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, analytics, auth, community, question, quiz, tag},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, analytics, quizzes, questions, tags, community, admin).
/// * Everything except login and logout sits behind the session check.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let require_session = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(
            Router::new()
                .route("/me", get(auth::me))
                .route_layer(require_session.clone()),
        );

    let analytics_routes = Router::new()
        .route("/", get(analytics::get_dashboard))
        .route("/latest", get(analytics::latest_dashboard))
        .route("/dimensions", get(analytics::list_dimensions))
        .route_layer(require_session.clone());

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route("/preview", post(quiz::preview_quiz))
        .route(
            "/{id}",
            get(quiz::get_quiz)
                .put(quiz::update_quiz)
                .delete(quiz::delete_quiz),
        )
        .route_layer(require_session.clone());

    let question_routes = Router::new()
        .route("/", get(question::list_questions))
        .merge(
            Router::new()
                .route("/", post(question::create_question))
                .route(
                    "/{id}",
                    put(question::update_question).delete(question::delete_question),
                )
                .route_layer(middleware::from_fn(admin_middleware)),
        )
        .route_layer(require_session.clone());

    let tag_routes = Router::new()
        .route("/", get(tag::list_tags))
        .merge(
            Router::new()
                .route("/", post(tag::create_tag))
                .route("/{id}", delete(tag::delete_tag))
                .route_layer(middleware::from_fn(admin_middleware)),
        )
        .route_layer(require_session.clone());

    let community_routes = Router::new()
        .route(
            "/posts",
            get(community::list_posts).post(community::create_post),
        )
        .route(
            "/posts/{id}",
            get(community::get_post).delete(community::delete_post),
        )
        .route(
            "/posts/{id}/comments",
            get(community::list_comments).post(community::create_comment),
        )
        .route("/posts/{id}/like", post(community::toggle_like))
        .route("/posts/{id}/report", post(community::report_post))
        .route_layer(require_session.clone());

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        // Double middleware protection: Session first, then Admin check
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(require_session);

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/analytics", analytics_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/tags", tag_routes)
        .nest("/api/community", community_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
