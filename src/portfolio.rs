// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::db::Store;
use crate::derivation::{Amounts, build_transaction, derive_amounts};
use crate::error::{Result, TrackError};
use crate::models::{Holding, NewTransaction, Session, Transaction, TransactionUpdate};
use crate::utils::parse_timestamp;

/// Caller-supplied values for an edit; the date is still raw text.
#[derive(Debug, Clone)]
pub struct RawUpdate {
    pub amount: Decimal,
    pub unit_price: Decimal,
    pub total_value: Decimal,
    pub date: String,
    pub note: Option<String>,
}

/// Owner-scoped view of the store for one session.
pub struct Portfolio<'a> {
    store: &'a Store,
    session: &'a Session,
}

impl<'a> Portfolio<'a> {
    pub fn new(store: &'a Store, session: &'a Session) -> Self {
        Portfolio { store, session }
    }

    pub fn create(&self, input: &NewTransaction) -> Result<Transaction> {
        let tx = build_transaction(self.session.owner(), input)?;
        let saved = self.store.save(&tx)?;
        info!(id = %saved.id, symbol = %saved.asset_symbol, kind = %saved.kind, "transaction recorded");
        Ok(saved)
    }

    pub fn transactions(&self) -> Result<Vec<Transaction>> {
        self.store.list_by_owner(self.session.owner())
    }

    pub fn transactions_for(&self, symbol: &str) -> Result<Vec<Transaction>> {
        self.store
            .list_by_owner_and_symbol(self.session.owner(), symbol)
    }

    pub fn deleted(&self) -> Result<Vec<Transaction>> {
        self.store.list_deleted(self.session.owner())
    }

    /// Validates the date before touching the store, then derives price,
    /// total and sign from the stored kind. Unknown ids are a no-op.
    pub fn update(&self, id: &str, raw: &RawUpdate) -> Result<bool> {
        let occurred_at = parse_timestamp(&raw.date)?;
        let Some(existing) = self.store.get(self.session.owner(), id)? else {
            return Ok(false);
        };
        let Amounts {
            amount,
            unit_price,
            total_value,
        } = derive_amounts(
            raw.amount.abs(),
            raw.unit_price,
            raw.total_value,
            &existing.kind,
        )?;
        let changes = TransactionUpdate {
            amount,
            unit_price,
            total_value,
            occurred_at,
            note: raw
                .note
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        self.store.update(self.session.owner(), id, &changes)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete(self.session.owner(), id)
    }

    pub fn restore(&self, id: &str) -> Result<bool> {
        self.store.restore(self.session.owner(), id)
    }

    pub fn holdings(&self, prices: &HashMap<String, Decimal>) -> Result<Vec<Holding>> {
        summarize(&self.transactions()?, prices)
    }
}

/// Per-symbol position: Σ amount, Σ total (sells are already negative), and
/// the gain against `prices` where a price is known. A market value or gain
/// outside the decimal range is left unset.
pub fn summarize(
    txs: &[Transaction],
    prices: &HashMap<String, Decimal>,
) -> Result<Vec<Holding>> {
    let mut acc: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for tx in txs {
        let entry = acc
            .entry(tx.asset_symbol.as_str())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 = entry.0.checked_add(tx.amount).ok_or_else(|| {
            TrackError::InvalidAmount(format!("net amount of {} is out of range", tx.asset_symbol))
        })?;
        entry.1 = entry.1.checked_add(tx.total_value).ok_or_else(|| {
            TrackError::InvalidAmount(format!("net invested in {} is out of range", tx.asset_symbol))
        })?;
    }

    Ok(acc
        .into_iter()
        .map(|(symbol, (net_amount, net_invested))| {
            let current_price = prices.get(symbol).copied();
            let current_value = current_price.and_then(|p| net_amount.checked_mul(p));
            let gain_pct = current_value.and_then(|value| gain(value, net_invested));
            Holding {
                symbol: symbol.to_string(),
                net_amount,
                net_invested,
                current_price,
                current_value,
                gain_pct,
            }
        })
        .collect())
}

fn gain(value: Decimal, invested: Decimal) -> Option<Decimal> {
    if invested.is_zero() {
        return Some(Decimal::ZERO);
    }
    value
        .checked_sub(invested)?
        .checked_div(invested.abs())?
        .checked_mul(Decimal::ONE_HUNDRED)
}
