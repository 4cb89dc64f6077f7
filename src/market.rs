// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! CoinMarketCap listings. Every call hits the API; nothing is cached.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{Result, TrackError};
use crate::models::Crypto;
use crate::utils::http_client;

pub const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";

/// Listings returned per call.
pub const MAX_LISTINGS: usize = 150;

/// Coins whose logos are requested.
pub const MAX_LOGOS: usize = 50;

#[derive(Debug, Deserialize)]
struct ListingResponse {
    data: Vec<Listing>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    id: i64,
    symbol: String,
    name: String,
    quote: Quote,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(rename = "USD")]
    usd: UsdQuote,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    #[serde(default)]
    price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    data: HashMap<String, Info>,
}

#[derive(Debug, Deserialize)]
struct Info {
    #[serde(default)]
    logo: Option<String>,
}

pub struct MarketClient {
    api_key: String,
    base_url: String,
}

impl MarketClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        MarketClient {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn get(&self, client: &reqwest::blocking::Client, url: &str) -> Result<String> {
        let resp = client
            .get(url)
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .header("accept", "application/json")
            .send()?
            .error_for_status()?;
        Ok(resp.text()?)
    }

    pub fn fetch_cryptos(&self) -> Result<Vec<Crypto>> {
        let client = http_client()?;
        let listings_url = format!("{}/v1/cryptocurrency/listings/latest", self.base_url);
        let body = self.get(&client, &listings_url)?;
        let listings = parse_listings(&body)?;

        let ids = listings
            .iter()
            .take(MAX_LOGOS)
            .map(|l| l.id.to_string())
            .collect::<Vec<_>>();
        let logos = if ids.is_empty() {
            HashMap::new()
        } else {
            let info_url = format!(
                "{}/v2/cryptocurrency/info?id={}",
                self.base_url,
                ids.join(",")
            );
            decode_logos(&self.get(&client, &info_url)?)?
        };

        let cryptos = join_listings(listings, &logos);
        debug!(count = cryptos.len(), "fetched market listings");
        Ok(cryptos)
    }
}

fn parse_listings(body: &str) -> Result<Vec<Listing>> {
    let resp: ListingResponse = serde_json::from_str(body)
        .map_err(|e| TrackError::Market(format!("decode listings: {}", e)))?;
    Ok(resp.data)
}

/// Logo URL by CoinMarketCap id, from the `/v2/cryptocurrency/info` body.
pub fn decode_logos(body: &str) -> Result<HashMap<String, String>> {
    let resp: InfoResponse = serde_json::from_str(body)
        .map_err(|e| TrackError::Market(format!("decode info: {}", e)))?;
    Ok(resp
        .data
        .into_iter()
        .filter_map(|(id, info)| info.logo.filter(|l| !l.is_empty()).map(|l| (id, l)))
        .collect())
}

/// Decodes a listings body and attaches logos by coin id.
pub fn decode_listings(body: &str, logos: &HashMap<String, String>) -> Result<Vec<Crypto>> {
    Ok(join_listings(parse_listings(body)?, logos))
}

fn join_listings(listings: Vec<Listing>, logos: &HashMap<String, String>) -> Vec<Crypto> {
    listings
        .into_iter()
        .take(MAX_LISTINGS)
        .map(|l| Crypto {
            current_price: l
                .quote
                .usd
                .price
                .and_then(Decimal::from_f64_retain)
                .unwrap_or(Decimal::ZERO),
            logo_url: logos.get(&l.id.to_string()).cloned(),
            symbol: l.symbol,
            name: l.name,
        })
        .collect()
}

/// Current USD price by symbol; the first listing wins on duplicate symbols.
pub fn price_map(cryptos: &[Crypto]) -> HashMap<String, Decimal> {
    let mut out = HashMap::with_capacity(cryptos.len());
    for c in cryptos {
        out.entry(c.symbol.clone()).or_insert(c.current_price);
    }
    out
}
