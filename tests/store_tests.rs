// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use cryptrack::TrackError;
use cryptrack::db::Store;
use cryptrack::derivation::build_transaction;
use cryptrack::models::{NewTransaction, Transaction, TransactionKind, TransactionUpdate};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn new_tx(owner: &str, symbol: &str, date: &str, kind: &str) -> Transaction {
    build_transaction(
        owner,
        &NewTransaction {
            asset_symbol: symbol.into(),
            amount: Decimal::ONE,
            unit_price: Decimal::from(100),
            total_value: Decimal::ZERO,
            date: date.into(),
            kind: kind.into(),
            note: Some("first".into()),
        },
    )
    .unwrap()
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
}

#[test]
fn save_then_list_round_trips_all_fields() {
    let store = Store::open_in_memory().unwrap();
    let tx = new_tx("alice", "BTC", "2024-01-01T10:00", "buy");
    let saved = store.save(&tx).unwrap();

    assert!(saved.created_at.is_some());
    assert!(saved.updated_at.is_some());
    assert!(saved.deleted_at.is_none());

    let listed = store.list_by_owner("alice").unwrap();
    assert_eq!(listed, vec![saved.clone()]);

    let mut without_stamps = saved;
    without_stamps.created_at = None;
    without_stamps.updated_at = None;
    assert_eq!(without_stamps, tx);
}

#[test]
fn list_by_owner_is_chronological_and_symbol_list_is_reversed() {
    let store = Store::open_in_memory().unwrap();
    let d2 = new_tx("alice", "ETH", "2024-02-01T00:00", "buy");
    let d3 = new_tx("alice", "ETH", "2024-03-01T00:00", "sell");
    let d1 = new_tx("alice", "ETH", "2024-01-01T00:00", "buy");
    let other_symbol = new_tx("alice", "BTC", "2024-01-15T00:00", "buy");
    for tx in [&d2, &d3, &d1, &other_symbol] {
        store.save(tx).unwrap();
    }

    let all: Vec<String> = store
        .list_by_owner("alice")
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(
        all,
        vec![d1.id.clone(), other_symbol.id.clone(), d2.id.clone(), d3.id.clone()]
    );

    let eth: Vec<String> = store
        .list_by_owner_and_symbol("alice", "ETH")
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(eth, vec![d3.id, d2.id, d1.id]);
}

#[test]
fn save_overwrites_existing_id_and_keeps_created_at() {
    let store = Store::open_in_memory().unwrap();
    let tx = new_tx("alice", "BTC", "2024-01-01T10:00", "buy");
    let first = store.save(&tx).unwrap();

    let mut changed = tx.clone();
    changed.amount = Decimal::from(7);
    changed.note = None;
    let second = store.save(&changed).unwrap();

    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.amount, Decimal::from(7));
    assert_eq!(second.note, None);
    assert_eq!(store.list_by_owner("alice").unwrap().len(), 1);
}

#[test]
fn update_replaces_mutable_fields_only() {
    let store = Store::open_in_memory().unwrap();
    let tx = store
        .save(&new_tx("alice", "BTC", "2024-01-01T10:00", "sell"))
        .unwrap();

    let changes = TransactionUpdate {
        amount: Decimal::from(2),
        unit_price: Decimal::from(5),
        total_value: Decimal::from(10),
        occurred_at: at("2024-02-01T00:00"),
        note: Some("adjusted".into()),
    };
    assert!(store.update("alice", &tx.id, &changes).unwrap());

    let got = store.get("alice", &tx.id).unwrap().unwrap();
    assert_eq!(got.amount, Decimal::from(2));
    assert_eq!(got.unit_price, Decimal::from(5));
    assert_eq!(got.total_value, Decimal::from(10));
    assert_eq!(got.occurred_at, at("2024-02-01T00:00"));
    assert_eq!(got.note.as_deref(), Some("adjusted"));
    assert_eq!(got.asset_symbol, "BTC");
    assert_eq!(got.kind, TransactionKind::Sell);
    assert_eq!(got.owner_id, "alice");
    assert_eq!(got.created_at, tx.created_at);
}

#[test]
fn update_of_unknown_id_is_a_no_op() {
    let store = Store::open_in_memory().unwrap();
    let tx = store
        .save(&new_tx("alice", "BTC", "2024-01-01T10:00", "buy"))
        .unwrap();
    let changes = TransactionUpdate {
        amount: Decimal::from(9),
        unit_price: Decimal::ONE,
        total_value: Decimal::from(9),
        occurred_at: at("2024-05-01T00:00"),
        note: None,
    };

    assert!(!store.update("alice", "does-not-exist", &changes).unwrap());
    assert_eq!(store.list_by_owner("alice").unwrap(), vec![tx]);
}

#[test]
fn delete_hides_row_and_is_idempotent() {
    let store = Store::open_in_memory().unwrap();
    let keep = store
        .save(&new_tx("alice", "BTC", "2024-01-01T10:00", "buy"))
        .unwrap();
    let gone = store
        .save(&new_tx("alice", "BTC", "2024-01-02T10:00", "buy"))
        .unwrap();

    assert!(store.delete("alice", &gone.id).unwrap());
    assert!(!store.delete("alice", &gone.id).unwrap());
    assert!(!store.delete("alice", "never-existed").unwrap());

    let ids: Vec<String> = store
        .list_by_owner("alice")
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![keep.id.clone()]);
    assert!(store.list_by_owner_and_symbol("alice", "BTC").unwrap().len() == 1);
    assert!(store.get("alice", &gone.id).unwrap().is_none());

    let trash = store.list_deleted("alice").unwrap();
    assert_eq!(trash.len(), 1);
    assert_eq!(trash[0].id, gone.id);
    assert!(trash[0].is_deleted());
}

#[test]
fn deleted_rows_ignore_updates_until_restored() {
    let store = Store::open_in_memory().unwrap();
    let tx = store
        .save(&new_tx("alice", "SOL", "2024-01-01T10:00", "buy"))
        .unwrap();
    store.delete("alice", &tx.id).unwrap();

    let changes = TransactionUpdate {
        amount: Decimal::from(3),
        unit_price: Decimal::ONE,
        total_value: Decimal::from(3),
        occurred_at: at("2024-01-05T00:00"),
        note: None,
    };
    assert!(!store.update("alice", &tx.id, &changes).unwrap());

    assert!(store.restore("alice", &tx.id).unwrap());
    assert!(!store.restore("alice", &tx.id).unwrap());
    let back = store.list_by_owner("alice").unwrap();
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].amount, Decimal::ONE);
    assert!(store.list_deleted("alice").unwrap().is_empty());
}

#[test]
fn owners_never_see_each_other() {
    let store = Store::open_in_memory().unwrap();
    let a = store
        .save(&new_tx("alice", "BTC", "2024-01-01T10:00", "buy"))
        .unwrap();
    store
        .save(&new_tx("bob", "BTC", "2024-01-01T11:00", "buy"))
        .unwrap();

    assert_eq!(store.list_by_owner("alice").unwrap().len(), 1);
    assert_eq!(store.list_by_owner_and_symbol("bob", "BTC").unwrap().len(), 1);
    assert!(store.get("bob", &a.id).unwrap().is_none());

    let changes = TransactionUpdate {
        amount: Decimal::from(100),
        unit_price: Decimal::ONE,
        total_value: Decimal::from(100),
        occurred_at: at("2024-01-01T10:00"),
        note: None,
    };
    assert!(!store.update("bob", &a.id, &changes).unwrap());
    assert!(!store.delete("bob", &a.id).unwrap());
    assert_eq!(store.list_by_owner("alice").unwrap(), vec![a]);
}

#[test]
fn unowned_rows_are_adopted_once() {
    let store = Store::open_in_memory().unwrap();
    store
        .save(&new_tx("", "BTC", "2024-01-01T10:00", "buy"))
        .unwrap();
    store
        .save(&new_tx("", "ETH", "2024-01-02T10:00", "buy"))
        .unwrap();

    assert_eq!(store.adopt_unowned("alice").unwrap(), 2);
    assert_eq!(store.adopt_unowned("bob").unwrap(), 0);
    assert_eq!(store.list_by_owner("alice").unwrap().len(), 2);
}

#[test]
fn unreadable_stored_amount_is_reported_as_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.db");
    let store = Store::open_at(&path, None).unwrap();
    store
        .save(&new_tx("alice", "BTC", "2024-01-01T10:00", "buy"))
        .unwrap();

    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute("UPDATE transactions SET amount='lots'", [])
        .unwrap();

    let err = store.list_by_owner("alice").unwrap_err();
    assert!(matches!(err, TrackError::Corrupt(_)));
}

#[test]
fn reopening_keeps_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.db");
    let id = {
        let store = Store::open_at(&path, None).unwrap();
        store
            .save(&new_tx("alice", "BTC", "2024-01-01T10:00", "buy"))
            .unwrap()
            .id
    };
    let store = Store::open_at(&path, None).unwrap();
    let rows = store.list_by_owner("alice").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
}
