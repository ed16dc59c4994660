//! End-to-end ledger flow through a file-backed store

use std::collections::BTreeMap;

use bankroll::error::AppError;
use bankroll::models::{CreateStreamRequest, PlaceBetRequest, SelectionRequest};
use bankroll::{BetStatus, LedgerStore, Outcome, StreamStatus};

fn stream_request(stake: f64) -> CreateStreamRequest {
    CreateStreamRequest {
        name: "Daily 1.10".to_string(),
        initial_stake: stake,
        target_daily_odds: 1.10,
        reinvestment_percentage: 0.8,
        target_balance: None,
        target_days: None,
    }
}

fn single(market: &str, odds: f64) -> SelectionRequest {
    SelectionRequest {
        market: market.to_string(),
        odds,
        estimated_probability: None,
        league_id: None,
        market_type_id: None,
    }
}

#[test]
fn test_win_then_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let store = LedgerStore::open(&path, "EUR").unwrap();
    store.transaction(|l| l.deposit(200.0).map(|_| ())).unwrap();
    let stream = store
        .transaction(|l| l.create_stream(&stream_request(50.0)).cloned())
        .unwrap();

    let bet = store
        .transaction(|l| {
            l.place_bet(
                stream.id,
                &PlaceBetRequest {
                    stake: 50.0,
                    selections: vec![single("Over 0.5 goals", 1.10)],
                },
            )
            .cloned()
        })
        .unwrap();

    let outcomes: BTreeMap<_, _> = bet.selections.iter().map(|s| (s.id, Outcome::Won)).collect();
    let report = store.transaction(|l| l.settle_bet(bet.id, &outcomes)).unwrap();

    assert_eq!(report.bet.status, BetStatus::Won);
    assert_eq!(report.bet.profit_loss, Some(5.0));
    assert_eq!(report.stream.current_balance, 55.0);
    assert_eq!(report.stream.current_day, 1);
    assert_eq!(report.bankroll.lifetime_profit_loss, 5.0);
    assert_eq!(report.bankroll.total_capital, 205.0);

    // Second settlement is rejected and changes nothing
    let again = store.transaction(|l| l.settle_bet(bet.id, &outcomes));
    assert!(matches!(again, Err(AppError::Conflict(_))));

    drop(store);
    let reopened = LedgerStore::open(&path, "EUR").unwrap();
    let (balance, lifetime, balanced) = reopened
        .read(|l| {
            (
                l.streams[&stream.id].current_balance,
                l.bankroll.lifetime_profit_loss,
                l.deployed_matches_streams(),
            )
        })
        .unwrap();
    assert_eq!(balance, 55.0);
    assert_eq!(lifetime, 5.0);
    assert!(balanced);
}

#[test]
fn test_accumulator_loss_fails_stream() {
    let store = LedgerStore::in_memory(bankroll::Ledger::seeded("EUR"));
    store.transaction(|l| l.deposit(100.0).map(|_| ())).unwrap();
    let stream = store
        .transaction(|l| l.create_stream(&stream_request(40.0)).cloned())
        .unwrap();

    let bet = store
        .transaction(|l| {
            l.place_bet(
                stream.id,
                &PlaceBetRequest {
                    stake: 40.0,
                    selections: vec![single("Home win", 1.5), single("Draw no bet", 1.4)],
                },
            )
            .cloned()
        })
        .unwrap();

    let outcomes: BTreeMap<_, _> = [
        (bet.selections[0].id, Outcome::Won),
        (bet.selections[1].id, Outcome::Lost),
    ]
    .into_iter()
    .collect();
    let report = store.transaction(|l| l.settle_bet(bet.id, &outcomes)).unwrap();

    assert_eq!(report.bet.status, BetStatus::Lost);
    assert_eq!(report.stream.status, StreamStatus::Failed);
    assert_eq!(report.stream.current_balance, 0.0);
    assert_eq!(report.bankroll.lifetime_profit_loss, -40.0);
    assert_eq!(report.bankroll.total_capital, 60.0);
    assert_eq!(report.bankroll.available_capital, 60.0);
    assert_eq!(report.bankroll.deployed_capital, 0.0);

    // A failed stream takes no further bets
    let next = store.transaction(|l| {
        l.place_bet(
            stream.id,
            &PlaceBetRequest {
                stake: 1.0,
                selections: vec![single("Home win", 1.5)],
            },
        )
        .map(|_| ())
    });
    assert!(next.is_err());
}
