// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use cryptrack::auth::{CredentialStore, MemoryCredentialStore};
use cryptrack::db::Store;
use cryptrack::models::{Session, TransactionKind};
use cryptrack::{cli, commands::transactions};
use rust_decimal::Decimal;

fn logged_in() -> (Store, MemoryCredentialStore, Session) {
    let store = Store::open_in_memory().unwrap();
    let creds = MemoryCredentialStore::default();
    let session = Session {
        user_id: "u1".into(),
        username: "alice".into(),
        opened_at: Utc::now(),
    };
    creds.save(&session).unwrap();
    (store, creds, session)
}

fn run_tx(store: &Store, creds: &MemoryCredentialStore, args: &[&str]) {
    let mut argv = vec!["cryptrack", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    transactions::handle(store, creds, tx_m).unwrap();
}

#[test]
fn add_sell_via_cli_stores_signed_values() {
    let (store, creds, session) = logged_in();
    run_tx(
        &store,
        &creds,
        &[
            "add", "btc", "--amount", "1", "--price", "10000", "--date", "2024-01-02T10:00",
            "--kind", "sell",
        ],
    );

    let rows = store.list_by_owner(&session.user_id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].asset_symbol, "BTC");
    assert_eq!(rows[0].kind, TransactionKind::Sell);
    assert_eq!(rows[0].amount, Decimal::from(-1));
    assert_eq!(rows[0].total_value, Decimal::from(-10000));
}

#[test]
fn list_with_symbol_is_newest_first() {
    let (store, creds, session) = logged_in();
    for date in ["2024-01-01T00:00", "2024-03-01T00:00", "2024-02-01T00:00"] {
        run_tx(
            &store,
            &creds,
            &["add", "ETH", "--amount", "1", "--total", "2000", "--date", date],
        );
    }
    run_tx(
        &store,
        &creds,
        &["add", "BTC", "--amount", "1", "--total", "1", "--date", "2024-01-15T00:00"],
    );

    let matches =
        cli::build_cli().get_matches_from(["cryptrack", "tx", "list", "--symbol", "eth"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(&store, &session, list_m).unwrap();
    let dates: Vec<String> = rows
        .iter()
        .map(|t| t.occurred_at.format("%Y-%m").to_string())
        .collect();
    assert_eq!(dates, vec!["2024-03", "2024-02", "2024-01"]);
    assert_eq!(rows[0].unit_price, Decimal::from(2000));
}

#[test]
fn edit_and_rm_via_cli() {
    let (store, creds, session) = logged_in();
    run_tx(
        &store,
        &creds,
        &["add", "SOL", "--amount", "3", "--price", "20", "--date", "2024-01-01T00:00"],
    );
    let id = store.list_by_owner(&session.user_id).unwrap()[0].id.clone();

    run_tx(
        &store,
        &creds,
        &[
            "edit", id.as_str(), "--amount", "2", "--price", "5", "--total", "10", "--date",
            "2024-02-01T00:00", "--note", "adjusted",
        ],
    );
    let edited = store.get(&session.user_id, &id).unwrap().unwrap();
    assert_eq!(edited.amount, Decimal::from(2));
    assert_eq!(edited.note.as_deref(), Some("adjusted"));
    assert_eq!(edited.asset_symbol, "SOL");

    run_tx(&store, &creds, &["rm", id.as_str()]);
    run_tx(&store, &creds, &["rm", id.as_str()]);
    assert!(store.list_by_owner(&session.user_id).unwrap().is_empty());

    run_tx(&store, &creds, &["restore", id.as_str()]);
    assert_eq!(store.list_by_owner(&session.user_id).unwrap().len(), 1);
}

#[test]
fn edit_of_a_sell_via_cli_rederives_signed_total() {
    let (store, creds, session) = logged_in();
    run_tx(
        &store,
        &creds,
        &[
            "add", "BTC", "--amount", "1", "--price", "100", "--date", "2024-01-02T10:00",
            "--kind", "sell",
        ],
    );
    let id = store.list_by_owner(&session.user_id).unwrap()[0].id.clone();

    run_tx(
        &store,
        &creds,
        &[
            "edit", id.as_str(), "--amount", "2", "--price", "100", "--date",
            "2024-01-02T10:00",
        ],
    );
    let edited = store.get(&session.user_id, &id).unwrap().unwrap();
    assert_eq!(edited.kind, TransactionKind::Sell);
    assert_eq!(edited.amount, Decimal::from(-2));
    assert_eq!(edited.total_value, Decimal::from(-200));
}

#[test]
fn add_keeps_the_kind_label_as_typed() {
    let (store, creds, session) = logged_in();
    run_tx(
        &store,
        &creds,
        &[
            "add", "DOT", "--amount", "2", "--price", "3", "--date", "2024-01-02T10:00",
            "--kind", "Staking",
        ],
    );
    let rows = store.list_by_owner(&session.user_id).unwrap();
    assert_eq!(rows[0].kind, TransactionKind::Other("Staking".into()));
    assert_eq!(rows[0].amount, Decimal::from(2));
    assert_eq!(rows[0].total_value, Decimal::from(6));
}

#[test]
fn add_with_out_of_range_total_fails() {
    let (store, creds, session) = logged_in();
    let matches = cli::build_cli().get_matches_from([
        "cryptrack", "tx", "add", "BTC", "--amount", "100000000000000000000", "--price",
        "10000000000", "--date", "2024-01-02T10:00",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let err = transactions::handle(&store, &creds, tx_m).unwrap_err();
    assert!(err.to_string().contains("out of range"));
    assert!(store.list_by_owner(&session.user_id).unwrap().is_empty());
}

#[test]
fn commands_require_a_session() {
    let store = Store::open_in_memory().unwrap();
    let creds = MemoryCredentialStore::default();
    let matches = cli::build_cli().get_matches_from(["cryptrack", "tx", "list"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let err = transactions::handle(&store, &creds, tx_m).unwrap_err();
    assert!(err.to_string().contains("Not logged in"));
}
