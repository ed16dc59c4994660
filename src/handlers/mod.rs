pub mod calc;
pub mod funds;
pub mod health;
pub mod stats;
pub mod streams;

use actix_web::web;
use std::sync::Arc;

use crate::AppState;
use bankroll::error::{self, AppError};
use bankroll::Ledger;

/// Run a ledger command on the blocking pool
///
/// A file-backed transaction writes the snapshot while holding the ledger
/// lock, which must not stall an async worker.
pub async fn run_transaction<T, F>(state: &web::Data<Arc<AppState>>, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&mut Ledger) -> error::Result<T> + Send + 'static,
{
    let state = state.clone();
    web::block(move || state.store.transaction(f)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankroll::LedgerStore;

    #[actix_web::test]
    async fn test_run_transaction_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let store = LedgerStore::open(&path, "EUR").unwrap();
        let state = web::Data::new(Arc::new(AppState { store }));

        let bankroll = run_transaction(&state, |l| l.deposit(120.0).cloned())
            .await
            .unwrap();
        assert_eq!(bankroll.available_capital, 120.0);

        let err = run_transaction(&state, |l| l.withdraw(500.0).cloned())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let reopened = LedgerStore::open(&path, "EUR").unwrap();
        let available = reopened.read(|l| l.bankroll.available_capital).unwrap();
        assert_eq!(available, 120.0);
    }
}
