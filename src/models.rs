// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TransactionKind {
    Buy,
    Sell,
    /// Any other label, kept exactly as given and signed like a buy.
    Other(String),
}

impl TransactionKind {
    pub fn parse(label: &str) -> Self {
        match label {
            "buy" => TransactionKind::Buy,
            "sell" => TransactionKind::Sell,
            other => TransactionKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionKind::Buy => "buy",
            TransactionKind::Sell => "sell",
            TransactionKind::Other(label) => label,
        }
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, TransactionKind::Sell)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TransactionKind {
    fn from(s: String) -> Self {
        TransactionKind::parse(&s)
    }
}

impl From<TransactionKind> for String {
    fn from(k: TransactionKind) -> Self {
        k.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub owner_id: String,
    pub asset_symbol: String,
    pub amount: Decimal,
    pub unit_price: Decimal,
    pub total_value: Decimal,
    pub occurred_at: NaiveDateTime,
    pub note: Option<String>,
    pub kind: TransactionKind,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Raw caller input for a new transaction, before derivation.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub asset_symbol: String,
    pub amount: Decimal,
    pub unit_price: Decimal,
    pub total_value: Decimal,
    pub date: String,
    pub kind: String,
    pub note: Option<String>,
}

/// The mutable subset of a transaction. Symbol, kind and owner never change.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    pub amount: Decimal,
    pub unit_price: Decimal,
    pub total_value: Decimal,
    pub occurred_at: NaiveDateTime,
    pub note: Option<String>,
}

/// A market listing. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crypto {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "currentPrice")]
    pub current_price: Decimal,
    #[serde(rename = "logoUrl", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub touch_id_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An authenticated user. Passed into every owner-scoped call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub opened_at: DateTime<Utc>,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Session {
            user_id: user.id.clone(),
            username: user.username.clone(),
            opened_at: Utc::now(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.user_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub net_amount: Decimal,
    pub net_invested: Decimal,
    pub current_price: Option<Decimal>,
    pub current_value: Option<Decimal>,
    pub gain_pct: Option<Decimal>,
}
