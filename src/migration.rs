// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One-way import of the flat JSON transaction file written by earlier
//! versions. The file is only ever read.

use chrono::{DateTime, FixedOffset};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::db::ts_str;
use crate::error::{Result, TrackError};
use crate::models::TransactionKind;
use crate::utils::DATE_STORE_FORMAT;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub imported: usize,
    pub skipped: usize,
}

/// One element of the legacy JSON array.
#[derive(Debug, Deserialize)]
pub struct LegacyRecord {
    pub id: String,
    #[serde(rename = "CryptoSymbol", alias = "cryptoSymbol")]
    pub crypto_symbol: String,
    pub amount: Decimal,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub total: Decimal,
    pub date: DateTime<FixedOffset>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "userId", alias = "user_id", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

pub fn read_legacy_file(path: &Path) -> Result<Vec<LegacyRecord>> {
    let data = fs::read(path)
        .map_err(|e| TrackError::Migration(format!("read {}: {}", path.display(), e)))?;
    serde_json::from_slice(&data)
        .map_err(|e| TrackError::Migration(format!("parse {}: {}", path.display(), e)))
}

/// Inserts every legacy record whose id is not in the store yet, inside one
/// SQLite transaction. Any failure rolls the whole import back.
pub fn import_legacy(conn: &mut Connection, path: &Path) -> Result<MigrationReport> {
    if !path.exists() {
        debug!(path = %path.display(), "no legacy file");
        return Ok(MigrationReport::default());
    }

    let records = read_legacy_file(path)?;
    let mut report = MigrationReport::default();
    let now = ts_str(chrono::Utc::now());

    let tx = conn.transaction().map_err(migration_err)?;
    {
        let mut exists = tx
            .prepare("SELECT EXISTS(SELECT 1 FROM transactions WHERE id=?1)")
            .map_err(migration_err)?;
        let mut insert = tx
            .prepare(
                "INSERT INTO transactions(id, owner_id, asset_symbol, amount, unit_price, total_value,
                                          occurred_at, note, kind, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            )
            .map_err(migration_err)?;

        for rec in &records {
            let present: bool = exists
                .query_row(params![rec.id], |r| r.get(0))
                .map_err(migration_err)?;
            if present {
                report.skipped += 1;
                continue;
            }
            let kind = TransactionKind::parse(&rec.kind);
            insert
                .execute(params![
                    rec.id,
                    rec.user_id.as_deref().unwrap_or(""),
                    rec.crypto_symbol,
                    rec.amount.to_string(),
                    rec.price.to_string(),
                    rec.total.to_string(),
                    rec.date.naive_local().format(DATE_STORE_FORMAT).to_string(),
                    rec.note.as_deref().filter(|s| !s.is_empty()),
                    kind.as_str(),
                    now,
                ])
                .map_err(migration_err)?;
            report.imported += 1;
        }
    }
    tx.commit().map_err(migration_err)?;

    info!(
        path = %path.display(),
        imported = report.imported,
        skipped = report.skipped,
        "legacy transactions migrated"
    );
    Ok(report)
}

fn migration_err(e: rusqlite::Error) -> TrackError {
    TrackError::Migration(e.to_string())
}
