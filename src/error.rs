// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Errors raised by the library layer. Command handlers wrap these in
/// `anyhow` with extra context.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Invalid date '{0}', expected YYYY-MM-DDTHH:MM")]
    InvalidDate(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Corrupt stored value: {0}")]
    Corrupt(String),

    #[error("Legacy migration failed: {0}")]
    Migration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Market data error: {0}")]
    Market(String),
}

impl From<reqwest::Error> for TrackError {
    fn from(err: reqwest::Error) -> Self {
        TrackError::Market(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
