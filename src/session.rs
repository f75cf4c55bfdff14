// src/session.rs

//! Authenticated-user session.
//!
//! The session is restored once at startup from a `SessionStore`, replaced on
//! login and cleared (in memory and in storage) on logout. Handlers receive it
//! through `AppState`; nothing else holds it.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, utils::jwt::read_claims};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub is_verified: bool,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Builds a session from a freshly issued token.
    pub fn from_token(token: String, username: &str, is_verified: bool) -> Result<Self, AppError> {
        let claims = read_claims(&token)?;
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Token subject is not a user id".to_string()))?;

        Ok(Self {
            expires_at: claims.expires_at(),
            user: SessionUser {
                id,
                username: username.to_string(),
                role: claims.role,
                is_verified,
            },
            token,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Persistence for the session between restarts.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, AppError>;
    fn save(&self, session: &Session) -> Result<(), AppError>;
    fn clear(&self) -> Result<(), AppError>;
}

/// Stores the session as a JSON file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Discarding unreadable session file {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the session in memory only. Used by tests and ephemeral runs.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, AppError> {
        Ok(self.slot.lock().map_err(poisoned)?.clone())
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        *self.slot.lock().map_err(poisoned)? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        *self.slot.lock().map_err(poisoned)? = None;
        Ok(())
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::InternalServerError("session lock poisoned".to_string())
}

/// Owns the current session and its storage.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Restores the stored session. An expired one is dropped from storage.
    pub fn init(store: Arc<dyn SessionStore>) -> Result<Self, AppError> {
        let restored = match store.load()? {
            Some(session) if session.is_expired(Utc::now()) => {
                tracing::info!("Stored session for {} has expired", session.user.username);
                store.clear()?;
                None
            }
            Some(session) => {
                tracing::info!("Restored session for {}", session.user.username);
                Some(session)
            }
            None => None,
        };

        Ok(Self {
            store,
            current: RwLock::new(restored),
        })
    }

    /// The live session, if any. A session that expired since it was
    /// restored is reported as absent.
    pub fn current(&self) -> Option<Session> {
        let guard = self.current.read().ok()?;
        guard
            .as_ref()
            .filter(|s| !s.is_expired(Utc::now()))
            .cloned()
    }

    pub fn sign_in(&self, session: Session) -> Result<(), AppError> {
        self.store.save(&session)?;
        tracing::info!("Signed in as {}", session.user.username);
        *self.current.write().map_err(poisoned)? = Some(session);
        Ok(())
    }

    /// Clears the session in memory and in storage.
    pub fn sign_out(&self) -> Result<(), AppError> {
        let previous = self.current.write().map_err(poisoned)?.take();
        self.store.clear()?;
        if let Some(session) = previous {
            tracing::info!("Signed out {}", session.user.username);
        }
        Ok(())
    }
}
