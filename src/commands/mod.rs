// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod exporter;
pub mod market;
pub mod portfolio;
pub mod transactions;
pub mod user;

use crate::auth::{self, CredentialStore};
use crate::models::Session;
use anyhow::{Result, anyhow};

pub(crate) fn require_session(creds: &dyn CredentialStore) -> Result<Session> {
    auth::current_session(creds)?
        .ok_or_else(|| anyhow!("Not logged in; run `cryptrack user login <username>` first"))
}
