// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use dotenvy::dotenv;
use url::Url;

/// Default duration applied when a section timer is switched on.
pub const DEFAULT_SECTION_MINUTES: u32 = 60;

/// Marks given to a question added to a section without explicit marks.
pub const DEFAULT_QUESTION_MARKS: u32 = 1;

/// Minimum answers a group needs before it can be flagged as a weak area.
pub const RECOMMENDATION_MIN_ANSWERS: usize = 5;

/// Number of weak areas reported.
pub const RECOMMENDATION_LIMIT: usize = 3;

/// Minimum answers a group needs to appear on the radar chart.
pub const RADAR_MIN_ANSWERS: usize = 3;

/// Radar chart axis cap.
pub const RADAR_LIMIT: usize = 7;

/// Label used when an answer cannot be attributed to a tag value.
pub const UNKNOWN_GROUP: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: Url,
    pub session_file: PathBuf,
    pub listen_addr: SocketAddr,
    pub backend_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let backend_url = env::var("BACKEND_URL").expect("BACKEND_URL must be set");
        let backend_url = Url::parse(&backend_url).expect("BACKEND_URL must be a valid URL");

        let session_file = env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".quizdesk/session.json"));

        let listen_addr = env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .expect("LISTEN_ADDR must be a socket address");

        let backend_timeout_secs = env::var("BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            backend_url,
            session_file,
            listen_addr,
            backend_timeout_secs,
            rust_log,
        }
    }
}
