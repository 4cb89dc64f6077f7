// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::error::TrackError;

/// Input format for transaction dates (`datetime-local` style).
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Storage format for `occurred_at`. Sorts lexically in chronological order.
pub const DATE_STORE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const UA: &str = concat!("cryptrack/", env!("CARGO_PKG_VERSION"));

pub fn http_client() -> Result<reqwest::blocking::Client, TrackError> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TrackError> {
    NaiveDateTime::parse_from_str(s.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| TrackError::InvalidDate(s.to_string()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub(crate) fn decimal_from_db(s: &str, column: &str) -> Result<Decimal, TrackError> {
    s.parse::<Decimal>()
        .map_err(|_| TrackError::Corrupt(format!("{} '{}'", column, s)))
}

pub(crate) fn naive_from_db(s: &str) -> Result<NaiveDateTime, TrackError> {
    NaiveDateTime::parse_from_str(s, DATE_STORE_FORMAT)
        .map_err(|_| TrackError::Corrupt(format!("occurred_at '{}'", s)))
}

pub(crate) fn utc_from_db(s: &str) -> Result<DateTime<Utc>, TrackError> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| TrackError::Corrupt(format!("timestamp '{}'", s)))
}

pub fn fmt_usd(d: &Decimal) -> String {
    format!("${}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
