// tests/analytics_tests.rs

mod common;

use std::sync::atomic::Ordering;

use common::spawn_app;
use quizdesk::models::question::Difficulty;

#[tokio::test]
async fn dashboard_groups_by_subject() {
    // Arrange
    let app = spawn_app().await;
    app.backend.add_question(1, "Physics", Difficulty::Easy);
    app.backend.add_question(2, "Chemistry", Difficulty::Hard);
    app.backend.add_attempt(15, 80.0, 1, 6, 5);
    app.backend.add_attempt(1, 60.0, 2, 5, 1);
    // Question 99 is not in the bank
    app.backend.add_attempt(10, 50.0, 99, 2, 1);
    assert_eq!(app.login("student").await, 200);

    // Act
    let response = app
        .client
        .get(app.url("/api/analytics?dimension=subject"))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["dimension"], "subject");
    assert_eq!(body["dimension_label"], "Subject");

    let groups = body["groups"].as_array().unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Physics", "Chemistry", "Unknown"]);
    assert_eq!(groups[0]["total"], 6);
    assert_eq!(groups[0]["correct"], 5);
    assert_eq!(groups[0]["accuracy"], 83.3);
    assert_eq!(groups[2]["unattempted"], 0);

    assert_eq!(body["overall"]["total"], 13);
    assert_eq!(body["overall"]["correct"], 7);
    assert_eq!(body["overall"]["accuracy"], 53.8);

    // Only Physics and Chemistry reach five answers
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["area"], "Chemistry");
    assert_eq!(recs[0]["accuracy"], 20.0);
    assert_eq!(recs[1]["area"], "Physics");

    // Unknown has two answers, below the radar floor
    let radar = body["radar"].as_array().unwrap();
    assert_eq!(radar.len(), 2);

    let trend = body["trend"].as_array().unwrap();
    let titles: Vec<&str> = trend.iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Practice 1", "Practice 10", "Practice 15"]);
    assert_eq!(trend[0]["accuracy"], 60.0);
}

#[tokio::test]
async fn dashboard_defaults_to_subject_and_supports_difficulty() {
    let app = spawn_app().await;
    app.backend.add_question(1, "Physics", Difficulty::Hard);
    app.backend.add_attempt(3, 40.0, 1, 3, 1);
    assert_eq!(app.login("student").await, 200);

    let body: serde_json::Value = app
        .client
        .get(app.url("/api/analytics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["dimension"], "subject");

    let body: serde_json::Value = app
        .client
        .get(app.url("/api/analytics?dimension=difficulty_level&timeframe=all"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["groups"][0]["name"], "Hard");
}

#[tokio::test]
async fn unknown_dimension_is_rejected() {
    let app = spawn_app().await;
    assert_eq!(app.login("student").await, 200);

    let response = app
        .client
        .get(app.url("/api/analytics?dimension=colour"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn empty_history_yields_empty_dashboard() {
    let app = spawn_app().await;
    assert_eq!(app.login("student").await, 200);

    let body: serde_json::Value = app
        .client
        .get(app.url("/api/analytics?dimension=topic"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["overall"]["total"], 0);
    assert_eq!(body["overall"]["accuracy"], 0.0);
    assert!(body["groups"].as_array().unwrap().is_empty());
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn fetch_failure_returns_single_error() {
    let app = spawn_app().await;
    app.backend.add_question(1, "Physics", Difficulty::Easy);
    app.backend.add_attempt(2, 70.0, 1, 5, 3);
    assert_eq!(app.login("student").await, 200);

    app.backend.fail_questions.store(true, Ordering::SeqCst);

    let response = app
        .client
        .get(app.url("/api/analytics?dimension=subject"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body.get("groups").is_none());
    assert!(body["error"].is_string());

    // Nothing was published as the latest dashboard
    let latest = app
        .client
        .get(app.url("/api/analytics/latest"))
        .send()
        .await
        .unwrap();
    assert_eq!(latest.status().as_u16(), 404);
}

#[tokio::test]
async fn latest_dashboard_tracks_last_request() {
    let app = spawn_app().await;
    app.backend.add_question(1, "Physics", Difficulty::Medium);
    app.backend.add_attempt(5, 90.0, 1, 4, 4);
    assert_eq!(app.login("student").await, 200);

    for dimension in ["subject", "difficulty_level"] {
        let response = app
            .client
            .get(app.url(&format!("/api/analytics?dimension={}", dimension)))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    let latest: serde_json::Value = app
        .client
        .get(app.url("/api/analytics/latest"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(latest["dimension"], "difficulty_level");
    assert_eq!(latest["groups"][0]["name"], "Medium");
}

#[tokio::test]
async fn dimensions_are_listed() {
    let app = spawn_app().await;
    assert_eq!(app.login("student").await, 200);

    let dims: Vec<serde_json::Value> = app
        .client
        .get(app.url("/api/analytics/dimensions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dims.len(), 7);
    assert_eq!(dims[0]["key"], "exam_type");
    assert_eq!(dims[6]["key"], "difficulty_level");
    assert_eq!(dims[6]["label"], "Difficulty");
}

#[tokio::test]
async fn logout_drops_latest_dashboard() {
    // Arrange
    let app = spawn_app().await;
    app.backend.add_question(1, "Physics", Difficulty::Easy);
    app.backend.add_attempt(4, 100.0, 1, 4, 4);
    assert_eq!(app.login("student").await, 200);

    let response = app
        .client
        .get(app.url("/api/analytics?dimension=subject"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // Act
    let logout = app
        .client
        .post(app.url("/api/auth/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status().as_u16(), 204);
    assert_eq!(app.login("admin_eve").await, 200);

    // Assert
    let latest = app
        .client
        .get(app.url("/api/analytics/latest"))
        .send()
        .await
        .unwrap();
    assert_eq!(latest.status().as_u16(), 404);
}

#[tokio::test]
async fn switching_user_drops_latest_dashboard() {
    let app = spawn_app().await;
    app.backend.add_question(1, "Physics", Difficulty::Easy);
    app.backend.add_attempt(4, 100.0, 1, 4, 4);
    assert_eq!(app.login("student").await, 200);

    app.client
        .get(app.url("/api/analytics?dimension=subject"))
        .send()
        .await
        .unwrap();

    // Same user signing in again keeps it
    assert_eq!(app.login("student").await, 200);
    let latest = app
        .client
        .get(app.url("/api/analytics/latest"))
        .send()
        .await
        .unwrap();
    assert_eq!(latest.status().as_u16(), 200);

    // A different user does not see it
    assert_eq!(app.login("admin_eve").await, 200);
    let latest = app
        .client
        .get(app.url("/api/analytics/latest"))
        .send()
        .await
        .unwrap();
    assert_eq!(latest.status().as_u16(), 404);
}
