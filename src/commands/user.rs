// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::{self, CredentialStore};
use crate::commands::require_session;
use crate::db::Store;
use anyhow::{Context, Result};

pub fn handle(store: &Store, creds: &dyn CredentialStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let (username, password) = credentials(sub)?;
            let session = auth::register(store, username, password)?;
            creds.save(&session)?;
            println!("Registered and logged in as {}", session.username);
        }
        Some(("login", sub)) => {
            let (username, password) = credentials(sub)?;
            let session = auth::login(store, username, password)?;
            creds.save(&session)?;
            println!("Logged in as {}", session.username);
        }
        Some(("logout", _)) => {
            creds.delete()?;
            println!("Logged out");
        }
        Some(("whoami", _)) => match auth::current_session(creds)? {
            Some(s) => println!("{} (since {})", s.username, s.opened_at.to_rfc3339()),
            None => println!("Not logged in"),
        },
        Some(("touch-id", sub)) => {
            let session = require_session(creds)?;
            let enabled = sub.get_one::<String>("state").map(String::as_str) == Some("on");
            auth::set_touch_id(store, &session, enabled)?;
            println!("Touch ID {}", if enabled { "enabled" } else { "disabled" });
        }
        _ => {}
    }
    Ok(())
}

fn credentials(sub: &clap::ArgMatches) -> Result<(&str, &str)> {
    let username = sub
        .get_one::<String>("username")
        .map(String::as_str)
        .context("username missing")?;
    let password = sub
        .get_one::<String>("password")
        .map(String::as_str)
        .context("password missing")?;
    Ok((username, password))
}
