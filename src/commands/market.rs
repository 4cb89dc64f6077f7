// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::market::MarketClient;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(config: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(config, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(config: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let client = MarketClient::new(config.require_api_key()?);
    let mut cryptos = client.fetch_cryptos()?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        cryptos.truncate(*limit);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cryptos)? {
        return Ok(());
    }
    let rows = cryptos
        .into_iter()
        .map(|c| vec![c.symbol, c.name, format!("{:.4}", c.current_price)])
        .collect();
    println!("{}", pretty_table(&["Symbol", "Name", "Price (USD)"], rows));
    Ok(())
}
