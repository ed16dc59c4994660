//! Bankroll - betting bankroll and compounding stream tracker
//!
//! This library provides:
//! - Odds and probability helpers
//! - Kelly criterion stake recommendations
//! - Compounding projections for daily "streams" of bets
//! - Streak and survival probability calculations
//! - A ledger with atomic bet settlement and JSON snapshot storage
//!
//! # Example
//!
//! ```
//! use bankroll::core::kelly::recommend_stake;
//! use bankroll::core::compounding::project_balance_over_time;
//!
//! let rec = recommend_stake(1_000.0, 2.0, 0.55);
//! assert!(rec.is_value_bet);
//! println!("Half Kelly stake: {:.2}", rec.half_kelly_stake);
//!
//! let projection = project_balance_over_time(50.0, 1.1, 0.8, 30);
//! println!("Day 30 balance: {:.2}", projection[30].balance);
//! ```

pub mod analytics;
pub mod config;
pub mod core;
pub mod error;
pub mod ledger;
pub mod models;

// Re-export commonly used types
pub use error::AppError;
pub use ledger::{Ledger, LedgerStore, SettlementReport};
pub use models::{
    Bankroll, Bet, BetStatus, League, MarketType, Outcome, Selection, Stream, StreamStatus,
    DEFAULT_BANKROLL_ID,
};
