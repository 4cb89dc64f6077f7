// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns caller input into a complete [`Transaction`]. No I/O happens here;
//! the store stamps bookkeeping timestamps on save.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Result, TrackError};
use crate::models::{NewTransaction, Transaction, TransactionKind};
use crate::utils::parse_timestamp;

/// Resolved numeric fields of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amounts {
    pub amount: Decimal,
    pub unit_price: Decimal,
    pub total_value: Decimal,
}

/// Fills in price or total from the other, then applies the sell sign.
///
/// `amount` is the unsigned magnitude the caller typed. A zero amount leaves
/// the price unset rather than dividing by zero. Results outside the decimal
/// range are rejected with `InvalidAmount`.
pub fn derive_amounts(
    amount: Decimal,
    unit_price: Decimal,
    total_value: Decimal,
    kind: &TransactionKind,
) -> Result<Amounts> {
    let mut amount = amount;
    let mut unit_price = unit_price;
    let mut total_value = total_value;

    if unit_price.is_zero() && total_value > Decimal::ZERO {
        if !amount.is_zero() {
            unit_price = total_value
                .checked_div(amount)
                .ok_or_else(|| out_of_range("price", total_value, amount))?;
        }
    } else if total_value.is_zero() && unit_price > Decimal::ZERO {
        total_value = unit_price
            .checked_mul(amount)
            .ok_or_else(|| out_of_range("total", unit_price, amount))?;
    }

    if kind.is_sell() {
        amount = -amount;
        total_value = amount
            .checked_mul(unit_price)
            .ok_or_else(|| out_of_range("total", unit_price, amount))?;
    }

    Ok(Amounts {
        amount,
        unit_price,
        total_value,
    })
}

fn out_of_range(field: &str, a: Decimal, b: Decimal) -> TrackError {
    TrackError::InvalidAmount(format!("{} from {} and {} is out of range", field, a, b))
}

pub fn build_transaction(owner_id: &str, input: &NewTransaction) -> Result<Transaction> {
    let kind = TransactionKind::parse(&input.kind);
    let Amounts {
        amount,
        unit_price,
        total_value,
    } = derive_amounts(input.amount, input.unit_price, input.total_value, &kind)?;

    let occurred_at = parse_timestamp(&input.date)?;

    Ok(Transaction {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        asset_symbol: input.asset_symbol.trim().to_string(),
        amount,
        unit_price,
        total_value,
        occurred_at,
        note: input
            .note
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        kind,
        created_at: None,
        updated_at: None,
        deleted_at: None,
    })
}
