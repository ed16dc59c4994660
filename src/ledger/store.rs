//! Ledger storage
//!
//! The whole ledger sits behind one mutex. A transaction works on a copy and
//! swaps it in only after the command succeeded and, for file-backed stores,
//! the snapshot was written.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::Ledger;
use crate::error::{AppError, Result};

pub struct LedgerStore {
    ledger: Mutex<Ledger>,
    path: Option<PathBuf>,
}

impl LedgerStore {
    /// Store that lives only as long as the process
    pub fn in_memory(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            path: None,
        }
    }

    /// Open a JSON snapshot, creating a seeded ledger if the file is missing
    pub fn open<P: AsRef<Path>>(path: P, currency: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let ledger = if path.exists() {
            let raw = fs::read(&path)?;
            let ledger: Ledger = serde_json::from_slice(&raw)?;
            info!(
                "Loaded ledger from {:?} ({} streams, {} bets)",
                path,
                ledger.streams.len(),
                ledger.bets.len()
            );
            ledger
        } else {
            let ledger = Ledger::seeded(currency);
            write_snapshot(&path, &ledger)?;
            info!("Created new ledger at {:?}", path);
            ledger
        };

        Ok(Self {
            ledger: Mutex::new(ledger),
            path: Some(path),
        })
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|_| AppError::Storage("ledger lock poisoned".to_string()))
    }

    /// Run a read-only query against the current ledger
    pub fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Ledger) -> T,
    {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    /// Apply a command atomically
    ///
    /// Either every change made by `f` becomes visible (and is persisted) or
    /// none does.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Ledger) -> Result<T>,
    {
        let mut guard = self.lock()?;
        let mut draft = guard.clone();

        let value = f(&mut draft)?;

        if let Some(ref path) = self.path {
            write_snapshot(path, &draft)?;
        }
        *guard = draft;

        Ok(value)
    }
}

/// Write via a temporary file so a crash never leaves half a snapshot
fn write_snapshot(path: &Path, ledger: &Ledger) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(ledger)?)?;
    fs::rename(&tmp, path)?;

    debug!("Ledger snapshot written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BetStatus, CreateStreamRequest, Outcome, PlaceBetRequest, SelectionRequest};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::thread;

    fn stream_request() -> CreateStreamRequest {
        CreateStreamRequest {
            name: "Daily".to_string(),
            initial_stake: 50.0,
            target_daily_odds: 1.1,
            reinvestment_percentage: 1.0,
            target_balance: None,
            target_days: None,
        }
    }

    #[test]
    fn test_failed_transaction_is_rolled_back() {
        let store = LedgerStore::in_memory(Ledger::new("EUR"));

        let result: Result<()> = store.transaction(|ledger| {
            ledger.deposit(100.0)?;
            Err(AppError::Conflict("abort".to_string()))
        });
        assert!(result.is_err());

        let available = store.read(|l| l.bankroll.available_capital).unwrap();
        assert_eq!(available, 0.0);
    }

    #[test]
    fn test_committed_transaction_is_visible() {
        let store = LedgerStore::in_memory(Ledger::new("EUR"));
        let bankroll = store.transaction(|l| l.deposit(80.0).cloned()).unwrap();

        assert_eq!(bankroll.available_capital, 80.0);
        assert_eq!(store.read(|l| l.bankroll.total_capital).unwrap(), 80.0);
        assert!(!store.is_persistent());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("ledger.json");

        {
            let store = LedgerStore::open(&path, "EUR").unwrap();
            assert!(store.is_persistent());
            store.transaction(|l| l.deposit(120.0).cloned()).unwrap();
            store
                .transaction(|l| l.create_stream(&stream_request()).cloned())
                .unwrap();
        }

        let store = LedgerStore::open(&path, "USD").unwrap();
        let (available, deployed, streams, currency) = store
            .read(|l| {
                (
                    l.bankroll.available_capital,
                    l.bankroll.deployed_capital,
                    l.streams.len(),
                    l.bankroll.currency.clone(),
                )
            })
            .unwrap();

        assert_eq!(available, 70.0);
        assert_eq!(deployed, 50.0);
        assert_eq!(streams, 1);
        // Existing ledger keeps its currency
        assert_eq!(currency, "EUR");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_open_rejects_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(
            LedgerStore::open(&path, "EUR"),
            Err(AppError::Storage(_))
        ));
    }

    #[test]
    fn test_concurrent_settlement_settles_once() {
        let store = Arc::new(LedgerStore::in_memory(Ledger::seeded("EUR")));
        store.transaction(|l| l.deposit(100.0).cloned()).unwrap();
        let stream_id = store
            .transaction(|l| l.create_stream(&stream_request()).map(|s| s.id))
            .unwrap();
        let bet = store
            .transaction(|l| {
                l.place_bet(
                    stream_id,
                    &PlaceBetRequest {
                        stake: 50.0,
                        selections: vec![SelectionRequest {
                            market: "Over 0.5 goals".to_string(),
                            odds: 1.1,
                            estimated_probability: Some(0.93),
                            league_id: None,
                            market_type_id: None,
                        }],
                    },
                )
                .cloned()
            })
            .unwrap();

        let outcomes: BTreeMap<u64, Outcome> =
            bet.selections.iter().map(|s| (s.id, Outcome::Won)).collect();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let outcomes = outcomes.clone();
                thread::spawn(move || store.transaction(|l| l.settle_bet(bet.id, &outcomes)))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let ok = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::Conflict(_))))
            .count();

        assert_eq!(ok, 1);
        assert_eq!(conflicts, 7);

        let (status, balance, profit) = store
            .read(|l| {
                (
                    l.bets[&bet.id].status,
                    l.streams[&stream_id].current_balance,
                    l.bankroll.lifetime_profit_loss,
                )
            })
            .unwrap();
        assert_eq!(status, BetStatus::Won);
        assert_eq!(balance, 55.0);
        assert_eq!(profit, 5.0);
    }
}
