// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString},
};
use chrono::{Duration, Utc};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::Store;
use crate::error::{Result, TrackError};
use crate::models::{Session, User};

/// Stored sessions older than this are discarded.
pub const SESSION_TTL_HOURS: i64 = 3;

/// Where the current session is remembered between runs.
pub trait CredentialStore {
    fn save(&self, session: &Session) -> Result<()>;
    fn load(&self) -> Result<Option<Session>>;
    fn delete(&self) -> Result<()>;
}

/// Session persisted as JSON in the data directory.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCredentialStore { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, session: &Session) -> Result<()> {
        let data = serde_json::to_vec(session)?;
        fs::write(&self.path, data)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn load(&self) -> Result<Option<Session>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Session>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, session: &Session) -> Result<()> {
        *lock(&self.slot) = Some(session.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<Session>> {
        Ok(lock(&self.slot).clone())
    }

    fn delete(&self) -> Result<()> {
        *lock(&self.slot) = None;
        Ok(())
    }
}

fn lock(m: &Mutex<Option<Session>>) -> std::sync::MutexGuard<'_, Option<Session>> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| TrackError::Auth(format!("unable to hash password: {}", e)))
}

fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Creates a user. The first user to register also adopts any legacy
/// transactions that were imported without an owner.
pub fn register(store: &Store, username: &str, password: &str) -> Result<Session> {
    let username = username.trim();
    if username.is_empty() {
        return Err(TrackError::Auth("username must not be empty".into()));
    }
    if password.is_empty() {
        return Err(TrackError::Auth("password must not be empty".into()));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        password_hash: hash_password(password)?,
        touch_id_enabled: false,
        created_at: now,
        updated_at: now,
    };
    store.insert_user(&user)?;
    info!(username, "user registered");

    if store.user_count()? == 1 {
        store.adopt_unowned(&user.id)?;
    }
    Ok(Session::for_user(&user))
}

pub fn login(store: &Store, username: &str, password: &str) -> Result<Session> {
    let Some(user) = store.user_by_username(username.trim())? else {
        warn!(username, "login for unknown user");
        return Err(TrackError::Auth("invalid credentials".into()));
    };
    if !verify_password(&user.password_hash, password) {
        warn!(username, "login with wrong password");
        return Err(TrackError::Auth("invalid credentials".into()));
    }
    info!(username, "user logged in");
    Ok(Session::for_user(&user))
}

/// The remembered session, if still fresh. Expired sessions are removed.
pub fn current_session(creds: &dyn CredentialStore) -> Result<Option<Session>> {
    let Some(session) = creds.load()? else {
        return Ok(None);
    };
    if Utc::now() - session.opened_at > Duration::hours(SESSION_TTL_HOURS) {
        info!(username = %session.username, "stored session expired");
        creds.delete()?;
        return Ok(None);
    }
    Ok(Some(session))
}

pub fn set_touch_id(store: &Store, session: &Session, enabled: bool) -> Result<()> {
    if !store.set_touch_id(session.owner(), enabled)? {
        return Err(TrackError::Auth(format!(
            "user '{}' no longer exists",
            session.username
        )));
    }
    Ok(())
}
