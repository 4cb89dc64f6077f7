// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::CredentialStore;
use crate::commands::require_session;
use crate::db::Store;
use crate::models::{NewTransaction, Session, Transaction};
use crate::portfolio::{Portfolio, RawUpdate};
use crate::utils::{fmt_usd, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};

pub fn handle(store: &Store, creds: &dyn CredentialStore, m: &clap::ArgMatches) -> Result<()> {
    let session = require_session(creds)?;
    let portfolio = Portfolio::new(store, &session);
    match m.subcommand() {
        Some(("add", sub)) => add(&portfolio, sub)?,
        Some(("list", sub)) => list(store, &session, sub)?,
        Some(("edit", sub)) => edit(&portfolio, sub)?,
        Some(("rm", sub)) => {
            let id = arg(sub, "id")?;
            if portfolio.delete(id)? {
                println!("Deleted {} (restore with `tx restore {}`)", id, id);
            } else {
                println!("No live transaction {}", id);
            }
        }
        Some(("restore", sub)) => {
            let id = arg(sub, "id")?;
            if portfolio.restore(id)? {
                println!("Restored {}", id);
            } else {
                println!("No deleted transaction {}", id);
            }
        }
        Some(("trash", sub)) => {
            let data = portfolio.deleted()?;
            print_transactions(&data, sub)?;
        }
        _ => {}
    }
    Ok(())
}

fn arg<'a>(sub: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    sub.get_one::<String>(name)
        .map(|s| s.trim())
        .with_context(|| format!("missing --{}", name))
}

fn opt_decimal(sub: &clap::ArgMatches, name: &str) -> Result<rust_decimal::Decimal> {
    match sub.get_one::<String>(name) {
        Some(raw) => parse_decimal(raw),
        None => Ok(rust_decimal::Decimal::ZERO),
    }
}

pub fn new_transaction_from(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    Ok(NewTransaction {
        asset_symbol: arg(sub, "symbol")?.to_uppercase(),
        amount: parse_decimal(arg(sub, "amount")?)?.abs(),
        unit_price: opt_decimal(sub, "price")?,
        total_value: opt_decimal(sub, "total")?,
        date: arg(sub, "date")?.to_string(),
        kind: arg(sub, "kind")?.to_string(),
        note: sub.get_one::<String>("note").cloned(),
    })
}

fn add(portfolio: &Portfolio<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let input = new_transaction_from(sub)?;
    let tx = portfolio.create(&input)?;
    println!(
        "Recorded {} {} {} @ {} = {} ({})",
        tx.kind,
        tx.amount,
        tx.asset_symbol,
        fmt_usd(&tx.unit_price),
        fmt_usd(&tx.total_value),
        tx.id
    );
    Ok(())
}

fn edit(portfolio: &Portfolio<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    let raw = RawUpdate {
        amount: parse_decimal(arg(sub, "amount")?)?,
        unit_price: opt_decimal(sub, "price")?,
        total_value: opt_decimal(sub, "total")?,
        date: arg(sub, "date")?.to_string(),
        note: sub.get_one::<String>("note").cloned(),
    };
    if portfolio.update(id, &raw)? {
        println!("Updated {}", id);
    } else {
        println!("No live transaction {}", id);
    }
    Ok(())
}

pub fn query_rows(
    store: &Store,
    session: &Session,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    let portfolio = Portfolio::new(store, session);
    let rows = match sub.get_one::<String>("symbol") {
        Some(symbol) => portfolio.transactions_for(&symbol.trim().to_uppercase())?,
        None => portfolio.transactions()?,
    };
    Ok(rows)
}

fn list(store: &Store, session: &Session, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store, session, sub)?;
    print_transactions(&data, sub)
}

fn print_transactions(data: &[Transaction], sub: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|t| {
            vec![
                t.occurred_at.format("%Y-%m-%d %H:%M").to_string(),
                t.asset_symbol.clone(),
                t.kind.to_string(),
                t.amount.to_string(),
                fmt_usd(&t.unit_price),
                fmt_usd(&t.total_value),
                t.note.clone().unwrap_or_default(),
                t.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Symbol", "Type", "Amount", "Price", "Total", "Note", "Id"],
            rows,
        )
    );
    Ok(())
}
