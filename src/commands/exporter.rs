// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::CredentialStore;
use crate::commands::require_session;
use crate::db::Store;
use crate::portfolio::Portfolio;
use anyhow::{Result, anyhow};

pub fn handle(store: &Store, creds: &dyn CredentialStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, creds, sub),
        _ => Ok(()),
    }
}

fn export_transactions(
    store: &Store,
    creds: &dyn CredentialStore,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".into());
    let out = sub
        .get_one::<String>("out")
        .map(|s| s.trim())
        .ok_or_else(|| anyhow!("--out is required"))?;

    let session = require_session(creds)?;
    let rows = Portfolio::new(store, &session).transactions()?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "date", "symbol", "type", "amount", "price", "total", "note",
            ])?;
            for t in &rows {
                wtr.write_record([
                    t.id.clone(),
                    t.occurred_at.format("%Y-%m-%dT%H:%M").to_string(),
                    t.asset_symbol.clone(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    t.unit_price.to_string(),
                    t.total_value.to_string(),
                    t.note.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
