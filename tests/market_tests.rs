// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cryptrack::TrackError;
use cryptrack::market::{MAX_LISTINGS, decode_listings, decode_logos, price_map};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;

fn listing(id: i64, symbol: &str, price: f64) -> serde_json::Value {
    json!({
        "id": id,
        "symbol": symbol,
        "name": format!("{} coin", symbol),
        "quote": { "USD": { "price": price } }
    })
}

#[test]
fn listings_join_logos_by_id() {
    let body = json!({
        "data": [listing(1, "BTC", 43000.5), listing(1027, "ETH", 2250.25)]
    })
    .to_string();
    let logos = decode_logos(
        &json!({
            "data": {
                "1": { "logo": "https://example.test/1.png" },
                "1027": { "logo": "" }
            }
        })
        .to_string(),
    )
    .unwrap();

    let cryptos = decode_listings(&body, &logos).unwrap();
    assert_eq!(cryptos.len(), 2);
    assert_eq!(cryptos[0].symbol, "BTC");
    assert_eq!(cryptos[0].name, "BTC coin");
    assert_eq!(cryptos[0].current_price, Decimal::new(430005, 1));
    assert_eq!(
        cryptos[0].logo_url.as_deref(),
        Some("https://example.test/1.png")
    );
    assert_eq!(cryptos[1].logo_url, None);
}

#[test]
fn listings_are_capped() {
    let data: Vec<_> = (0..200).map(|i| listing(i, &format!("C{}", i), 1.0)).collect();
    let body = json!({ "data": data }).to_string();
    let cryptos = decode_listings(&body, &HashMap::new()).unwrap();
    assert_eq!(cryptos.len(), MAX_LISTINGS);
    assert_eq!(cryptos.last().unwrap().symbol, "C149");
}

#[test]
fn missing_price_becomes_zero() {
    let body = json!({
        "data": [{ "id": 5, "symbol": "NEW", "name": "New", "quote": { "USD": { "price": null } } }]
    })
    .to_string();
    let cryptos = decode_listings(&body, &HashMap::new()).unwrap();
    assert!(cryptos[0].current_price.is_zero());
}

#[test]
fn error_bodies_are_market_errors() {
    let body = r#"{"status": {"error_code": 1002, "error_message": "API key missing."}}"#;
    assert!(matches!(
        decode_listings(body, &HashMap::new()).unwrap_err(),
        TrackError::Market(_)
    ));
}

#[test]
fn price_map_keeps_first_symbol() {
    let body = json!({
        "data": [listing(1, "BTC", 100.0), listing(2, "BTC", 1.0), listing(3, "ETH", 10.0)]
    })
    .to_string();
    let prices = price_map(&decode_listings(&body, &HashMap::new()).unwrap());
    assert_eq!(prices.len(), 2);
    assert_eq!(prices["BTC"], Decimal::from(100));
    assert_eq!(prices["ETH"], Decimal::from(10));
}

#[test]
fn listings_serialize_with_camel_case_fields() {
    let body = json!({ "data": [listing(1, "BTC", 2.0)] }).to_string();
    let cryptos = decode_listings(&body, &HashMap::new()).unwrap();
    let v = serde_json::to_value(&cryptos[0]).unwrap();
    assert!(v.get("currentPrice").is_some());
    assert!(v.get("logoUrl").is_none());
}
