// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::CredentialStore;
use crate::commands::require_session;
use crate::config::Config;
use crate::db::Store;
use crate::market::{MarketClient, price_map};
use crate::portfolio::Portfolio;
use crate::utils::{fmt_usd, maybe_print_json, pretty_table};
use anyhow::Result;
use std::collections::HashMap;

pub fn handle(
    store: &Store,
    creds: &dyn CredentialStore,
    config: &Config,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let session = require_session(creds)?;
    let prices = if sub.get_flag("live") {
        let client = MarketClient::new(config.require_api_key()?);
        price_map(&client.fetch_cryptos()?)
    } else {
        HashMap::new()
    };

    let holdings = Portfolio::new(store, &session).holdings(&prices)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &holdings)? {
        return Ok(());
    }

    let dash = || "-".to_string();
    let rows = holdings
        .into_iter()
        .map(|h| {
            vec![
                h.symbol,
                format!("{:.8}", h.net_amount.normalize()),
                fmt_usd(&h.net_invested),
                h.current_price.as_ref().map(fmt_usd).unwrap_or_else(dash),
                h.current_value.as_ref().map(fmt_usd).unwrap_or_else(dash),
                h.gain_pct
                    .map(|g| format!("{:.2}%", g))
                    .unwrap_or_else(dash),
            ]
        })
        .collect();

    println!(
        "{}",
        pretty_table(
            &["Symbol", "Holding", "Invested", "Price", "Value", "Gain"],
            rows
        )
    );
    Ok(())
}
