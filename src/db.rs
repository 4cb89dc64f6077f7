// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use std::path::Path;
use tracing::{debug, info};

use crate::config::Paths;
use crate::error::{Result, TrackError};
use crate::migration::{self, MigrationReport};
use crate::models::{Transaction, TransactionKind, TransactionUpdate, User};
use crate::utils::{DATE_STORE_FORMAT, decimal_from_db, naive_from_db, utc_from_db};

const SCHEMA_VERSION: i64 = 1;

const TX_COLUMNS: &str = "id, owner_id, asset_symbol, amount, unit_price, total_value, \
     occurred_at, note, kind, created_at, updated_at, deleted_at";

const USER_COLUMNS: &str = "id, username, password_hash, touch_id_enabled, created_at, updated_at";

/// SQLite-backed transaction and user store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens the database under `paths`, creating the schema and folding in
    /// the legacy JSON file before returning.
    pub fn open(paths: &Paths) -> Result<Self> {
        std::fs::create_dir_all(&paths.data_dir)?;
        let store = Self::open_at(&paths.database, Some(&paths.legacy_file))?;
        info!(db = %paths.database.display(), "store ready");
        Ok(store)
    }

    pub fn open_at(db_path: &Path, legacy_file: Option<&Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn, legacy_file)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, legacy_file: Option<&Path>) -> Result<Self> {
        let mut store = Store { conn };
        store.init_schema()?;
        if let Some(path) = legacy_file {
            store.import_legacy(path)?;
        }
        Ok(store)
    }

    fn init_schema(&mut self) -> Result<()> {
        self.conn.execute_batch(
            r#"
        CREATE TABLE IF NOT EXISTS schema_version(
            version INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS transactions(
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL DEFAULT '',
            asset_symbol TEXT NOT NULL,
            amount TEXT NOT NULL,
            unit_price TEXT NOT NULL,
            total_value TEXT NOT NULL,
            occurred_at TEXT NOT NULL,
            note TEXT,
            kind TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_transactions_owner ON transactions(owner_id);
        CREATE INDEX IF NOT EXISTS idx_transactions_symbol ON transactions(asset_symbol);
        CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(occurred_at);

        CREATE TABLE IF NOT EXISTS users(
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            touch_id_enabled INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
        )?;

        let version: Option<i64> = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |r| {
                r.get(0)
            })
            .optional()?;
        if version.is_none() {
            self.conn.execute(
                "INSERT INTO schema_version(version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;
        }
        Ok(())
    }

    /// Imports records from a legacy JSON file that are not stored yet.
    /// A missing file is not an error.
    pub fn import_legacy(&mut self, path: &Path) -> Result<MigrationReport> {
        migration::import_legacy(&mut self.conn, path)
    }

    // ── Transactions ──────────────────────────────────────────

    /// Inserts or fully overwrites the row with `tx.id`. `created_at` of an
    /// existing row is kept; `updated_at` is always stamped now.
    pub fn save(&self, tx: &Transaction) -> Result<Transaction> {
        let now = now_str();
        let created = tx.created_at.map(ts_str).unwrap_or_else(|| now.clone());
        self.conn.execute(
            "INSERT INTO transactions(id, owner_id, asset_symbol, amount, unit_price, total_value,
                                      occurred_at, note, kind, created_at, updated_at, deleted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(id) DO UPDATE SET
                owner_id=excluded.owner_id,
                asset_symbol=excluded.asset_symbol,
                amount=excluded.amount,
                unit_price=excluded.unit_price,
                total_value=excluded.total_value,
                occurred_at=excluded.occurred_at,
                note=excluded.note,
                kind=excluded.kind,
                updated_at=excluded.updated_at,
                deleted_at=excluded.deleted_at",
            params![
                tx.id,
                tx.owner_id,
                tx.asset_symbol,
                tx.amount.to_string(),
                tx.unit_price.to_string(),
                tx.total_value.to_string(),
                tx.occurred_at.format(DATE_STORE_FORMAT).to_string(),
                tx.note,
                tx.kind.as_str(),
                created,
                now,
                tx.deleted_at.map(ts_str),
            ],
        )?;
        debug!(id = %tx.id, symbol = %tx.asset_symbol, "transaction saved");

        let sql = format!("SELECT {TX_COLUMNS} FROM transactions WHERE id=?1");
        let raw = self.conn.query_row(&sql, params![tx.id], RawTransaction::from_row)?;
        raw.into_transaction()
    }

    /// Live transactions of `owner`, oldest first.
    pub fn list_by_owner(&self, owner: &str) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TX_COLUMNS} FROM transactions
             WHERE owner_id=?1 AND deleted_at IS NULL
             ORDER BY occurred_at ASC, created_at ASC, id ASC"
        );
        self.query_transactions(&sql, params![owner])
    }

    /// Live transactions of `owner` for one symbol, newest first.
    pub fn list_by_owner_and_symbol(&self, owner: &str, symbol: &str) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TX_COLUMNS} FROM transactions
             WHERE owner_id=?1 AND asset_symbol=?2 AND deleted_at IS NULL
             ORDER BY occurred_at DESC, created_at DESC, id DESC"
        );
        self.query_transactions(&sql, params![owner, symbol])
    }

    /// Soft-deleted transactions of `owner`, most recently deleted first.
    pub fn list_deleted(&self, owner: &str) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {TX_COLUMNS} FROM transactions
             WHERE owner_id=?1 AND deleted_at IS NOT NULL
             ORDER BY deleted_at DESC, id ASC"
        );
        self.query_transactions(&sql, params![owner])
    }

    pub fn get(&self, owner: &str, id: &str) -> Result<Option<Transaction>> {
        let sql = format!(
            "SELECT {TX_COLUMNS} FROM transactions
             WHERE id=?1 AND owner_id=?2 AND deleted_at IS NULL"
        );
        let raw = self
            .conn
            .query_row(&sql, params![id, owner], RawTransaction::from_row)
            .optional()?;
        raw.map(RawTransaction::into_transaction).transpose()
    }

    /// Replaces the mutable fields of a live row. Returns `false` when no row
    /// matched; that is not an error.
    pub fn update(&self, owner: &str, id: &str, changes: &TransactionUpdate) -> Result<bool> {
        let n = self.conn.execute(
            "UPDATE transactions
             SET amount=?1, unit_price=?2, total_value=?3, occurred_at=?4, note=?5, updated_at=?6
             WHERE id=?7 AND owner_id=?8 AND deleted_at IS NULL",
            params![
                changes.amount.to_string(),
                changes.unit_price.to_string(),
                changes.total_value.to_string(),
                changes.occurred_at.format(DATE_STORE_FORMAT).to_string(),
                changes.note,
                now_str(),
                id,
                owner,
            ],
        )?;
        if n == 0 {
            debug!(id, "update matched no live transaction");
        }
        Ok(n > 0)
    }

    /// Marks a row deleted. Deleting a missing or already deleted id is a no-op.
    pub fn delete(&self, owner: &str, id: &str) -> Result<bool> {
        let now = now_str();
        let n = self.conn.execute(
            "UPDATE transactions SET deleted_at=?1, updated_at=?1
             WHERE id=?2 AND owner_id=?3 AND deleted_at IS NULL",
            params![now, id, owner],
        )?;
        if n == 0 {
            debug!(id, "delete matched no live transaction");
        }
        Ok(n > 0)
    }

    pub fn restore(&self, owner: &str, id: &str) -> Result<bool> {
        let n = self.conn.execute(
            "UPDATE transactions SET deleted_at=NULL, updated_at=?1
             WHERE id=?2 AND owner_id=?3 AND deleted_at IS NOT NULL",
            params![now_str(), id, owner],
        )?;
        Ok(n > 0)
    }

    /// Hands rows imported without an owner to `owner`.
    pub fn adopt_unowned(&self, owner: &str) -> Result<usize> {
        let n = self.conn.execute(
            "UPDATE transactions SET owner_id=?1, updated_at=?2 WHERE owner_id=''",
            params![owner, now_str()],
        )?;
        if n > 0 {
            info!(owner, adopted = n, "assigned unowned transactions");
        }
        Ok(n)
    }

    fn query_transactions<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, RawTransaction::from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_transaction()?);
        }
        Ok(out)
    }

    // ── Users ─────────────────────────────────────────────────

    pub fn insert_user(&self, user: &User) -> Result<()> {
        let res = self.conn.execute(
            "INSERT INTO users(id, username, password_hash, touch_id_enabled, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id,
                user.username,
                user.password_hash,
                user.touch_id_enabled,
                ts_str(user.created_at),
                ts_str(user.updated_at),
            ],
        );
        match res {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(TrackError::Auth(format!(
                    "username '{}' is already taken",
                    user.username
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username=?1");
        let raw = self
            .conn
            .query_row(&sql, params![username], RawUser::from_row)
            .optional()?;
        raw.map(RawUser::into_user).transpose()
    }

    pub fn user_by_id(&self, id: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id=?1");
        let raw = self
            .conn
            .query_row(&sql, params![id], RawUser::from_row)
            .optional()?;
        raw.map(RawUser::into_user).transpose()
    }

    pub fn user_count(&self) -> Result<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
        Ok(n)
    }

    pub fn set_touch_id(&self, user_id: &str, enabled: bool) -> Result<bool> {
        let n = self.conn.execute(
            "UPDATE users SET touch_id_enabled=?1, updated_at=?2 WHERE id=?3",
            params![enabled, now_str(), user_id],
        )?;
        Ok(n > 0)
    }
}

pub(crate) fn ts_str(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn now_str() -> String {
    ts_str(Utc::now())
}

/// Row as stored; converted outside the rusqlite closure so parse failures
/// become `TrackError::Corrupt`.
struct RawTransaction {
    id: String,
    owner_id: String,
    asset_symbol: String,
    amount: String,
    unit_price: String,
    total_value: String,
    occurred_at: String,
    note: Option<String>,
    kind: String,
    created_at: String,
    updated_at: String,
    deleted_at: Option<String>,
}

impl RawTransaction {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawTransaction {
            id: r.get(0)?,
            owner_id: r.get(1)?,
            asset_symbol: r.get(2)?,
            amount: r.get(3)?,
            unit_price: r.get(4)?,
            total_value: r.get(5)?,
            occurred_at: r.get(6)?,
            note: r.get(7)?,
            kind: r.get(8)?,
            created_at: r.get(9)?,
            updated_at: r.get(10)?,
            deleted_at: r.get(11)?,
        })
    }

    fn into_transaction(self) -> Result<Transaction> {
        Ok(Transaction {
            amount: decimal_from_db(&self.amount, "amount")?,
            unit_price: decimal_from_db(&self.unit_price, "unit_price")?,
            total_value: decimal_from_db(&self.total_value, "total_value")?,
            occurred_at: naive_from_db(&self.occurred_at)?,
            kind: TransactionKind::parse(&self.kind),
            created_at: Some(utc_from_db(&self.created_at)?),
            updated_at: Some(utc_from_db(&self.updated_at)?),
            deleted_at: self.deleted_at.as_deref().map(utc_from_db).transpose()?,
            id: self.id,
            owner_id: self.owner_id,
            asset_symbol: self.asset_symbol,
            note: self.note,
        })
    }
}

struct RawUser {
    id: String,
    username: String,
    password_hash: String,
    touch_id_enabled: bool,
    created_at: String,
    updated_at: String,
}

impl RawUser {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawUser {
            id: r.get(0)?,
            username: r.get(1)?,
            password_hash: r.get(2)?,
            touch_id_enabled: r.get(3)?,
            created_at: r.get(4)?,
            updated_at: r.get(5)?,
        })
    }

    fn into_user(self) -> Result<User> {
        Ok(User {
            created_at: utc_from_db(&self.created_at)?,
            updated_at: utc_from_db(&self.updated_at)?,
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            touch_id_enabled: self.touch_id_enabled,
        })
    }
}
