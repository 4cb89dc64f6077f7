// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LoggingConfig;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com", "cryptrack", "cryptrack"));

pub const DATABASE_FILE: &str = "app.db";
pub const LEGACY_FILE: &str = "crypto_transactions.json";
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some(l) if l.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub legacy_file: PathBuf,
    pub session_file: PathBuf,
}

impl Paths {
    pub fn in_dir(dir: &Path) -> Self {
        Paths {
            data_dir: dir.to_path_buf(),
            database: dir.join(DATABASE_FILE),
            legacy_file: dir.join(LEGACY_FILE),
            session_file: dir.join(SESSION_FILE),
        }
    }

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create data dir {}", self.data_dir.display()))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub env: Environment,
    pub paths: Paths,
    pub api_key: Option<String>,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Environment::from_label(lookup("CRYPTRACK_ENV").as_deref());
        let data_dir = match lookup("CRYPTRACK_DATA_DIR").filter(|s| !s.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir(env)?,
        };
        let api_key = lookup("CMC_API_KEY").filter(|s| !s.trim().is_empty());

        let mut logging = LoggingConfig::default();
        if let Some(level) = lookup("CRYPTRACK_LOG") {
            logging.level = level;
        }
        if let Some(format) = lookup("CRYPTRACK_LOG_FORMAT") {
            logging.format = format;
        }

        Ok(Config {
            env,
            paths: Paths::in_dir(&data_dir),
            api_key,
            logging,
        })
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("CMC_API_KEY is not set; export it to fetch market data")
    }
}

fn default_data_dir(env: Environment) -> Result<PathBuf> {
    match env {
        Environment::Development => Ok(PathBuf::from("data")),
        Environment::Production => {
            let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
                .context("Could not determine platform-specific data dir")?;
            Ok(proj.data_dir().to_path_buf())
        }
    }
}
