// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod derivation;
pub mod error;
pub mod logging;
pub mod market;
pub mod migration;
pub mod models;
pub mod portfolio;
pub mod utils;

pub use error::{Result, TrackError};
