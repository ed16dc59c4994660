//! Ledger of bankroll, streams, bets and reference statistics
//!
//! The `Ledger` is plain data; commands and settlement are methods on it and
//! are applied atomically through `LedgerStore::transaction`.

pub mod commands;
pub mod settlement;
pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::compounding::{days_to_target, project_balance_over_time};
use crate::core::streak::{current_streak, longest_streaks, win_rate};
use crate::error::{AppError, Result};
use crate::models::{
    Bankroll, Bet, BetId, BetStatus, HitRate, League, LeagueId, MarketType, MarketTypeId, Stream,
    StreamDetail, StreamId,
};

pub use settlement::SettlementReport;
pub use store::LedgerStore;

/// Reference leagues seeded into a new ledger: (name, country, baseline)
const SEED_LEAGUES: [(&str, &str, f64); 6] = [
    ("Premier League", "England", 0.74),
    ("La Liga", "Spain", 0.72),
    ("Bundesliga", "Germany", 0.77),
    ("Serie A", "Italy", 0.70),
    ("Ligue 1", "France", 0.71),
    ("Eredivisie", "Netherlands", 0.80),
];

/// Reference market types seeded into a new ledger: (name, category, baseline)
const SEED_MARKET_TYPES: [(&str, &str, f64); 6] = [
    ("Over 0.5 goals", "goals", 0.93),
    ("Over 1.5 goals", "goals", 0.76),
    ("Double chance", "result", 0.80),
    ("Draw no bet", "result", 0.65),
    ("Both teams to score", "goals", 0.52),
    ("Home win", "result", 0.46),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub bankroll: Bankroll,
    pub streams: BTreeMap<StreamId, Stream>,
    pub bets: BTreeMap<BetId, Bet>,
    pub leagues: BTreeMap<LeagueId, League>,
    pub market_types: BTreeMap<MarketTypeId, MarketType>,
    next_id: u64,
}

impl Ledger {
    /// Empty ledger with no reference data
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            bankroll: Bankroll::new(currency),
            streams: BTreeMap::new(),
            bets: BTreeMap::new(),
            leagues: BTreeMap::new(),
            market_types: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Ledger with the default leagues and market types
    pub fn seeded(currency: impl Into<String>) -> Self {
        let mut ledger = Self::new(currency);

        for (name, country, baseline) in SEED_LEAGUES {
            let id = ledger.allocate_id();
            ledger.leagues.insert(
                id,
                League {
                    id,
                    name: name.to_string(),
                    country: country.to_string(),
                    baseline_probability: baseline,
                    hit_rate: HitRate::default(),
                },
            );
        }

        for (name, category, baseline) in SEED_MARKET_TYPES {
            let id = ledger.allocate_id();
            ledger.market_types.insert(
                id,
                MarketType {
                    id,
                    name: name.to_string(),
                    category: category.to_string(),
                    baseline_probability: baseline,
                    hit_rate: HitRate::default(),
                },
            );
        }

        ledger
    }

    pub(crate) fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn stream(&self, id: StreamId) -> Result<&Stream> {
        self.streams
            .get(&id)
            .ok_or_else(|| AppError::not_found("Stream", id))
    }

    pub(crate) fn stream_mut(&mut self, id: StreamId) -> Result<&mut Stream> {
        self.streams
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Stream", id))
    }

    pub fn bet(&self, id: BetId) -> Result<&Bet> {
        self.bets.get(&id).ok_or_else(|| AppError::not_found("Bet", id))
    }

    /// Bets of a stream in placement order
    pub fn stream_bets(&self, stream_id: StreamId) -> Vec<&Bet> {
        self.bets
            .values()
            .filter(|b| b.stream_id == stream_id)
            .collect()
    }

    /// All bets in placement order
    pub fn all_bets(&self) -> impl Iterator<Item = &Bet> {
        self.bets.values()
    }

    /// Stream with its bets, streaks and best-case projection
    pub fn stream_detail(&self, id: StreamId, projection_days: u32) -> Result<StreamDetail> {
        let stream = self.stream(id)?;
        let bets: Vec<Bet> = self.stream_bets(id).into_iter().cloned().collect();
        let statuses: Vec<BetStatus> = bets.iter().map(|b| b.status).collect();

        let days_to_target = stream.target_balance.map(|target| {
            days_to_target(
                stream.current_balance,
                target,
                stream.target_daily_odds,
                stream.reinvestment_percentage,
            )
        });

        Ok(StreamDetail {
            streak: current_streak(statuses.iter().copied()),
            longest_streaks: longest_streaks(statuses.iter().copied()),
            win_rate: win_rate(statuses),
            target_reached: stream.target_reached(),
            projection: project_balance_over_time(
                stream.current_balance,
                stream.target_daily_odds,
                stream.reinvestment_percentage,
                projection_days,
            ),
            days_to_target,
            stream: stream.clone(),
            bets,
        })
    }

    /// Deployed capital must equal the summed balances of active streams
    pub fn deployed_matches_streams(&self) -> bool {
        let active: f64 = self
            .streams
            .values()
            .filter(|s| s.is_active())
            .map(|s| s.current_balance)
            .sum();
        (active - self.bankroll.deployed_capital).abs() < 0.005
    }
}
