use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::compounding::{DaysToTarget, ProjectionPoint};
use crate::core::streak::{Streak, StreakRecord, SurvivalRow};

/// Well-known identifier of the one bankroll the ledger holds
pub const DEFAULT_BANKROLL_ID: &str = "default-bankroll";

pub type StreamId = u64;
pub type BetId = u64;
pub type SelectionId = u64;
pub type LeagueId = u64;
pub type MarketTypeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    Active,
    Completed,
    Failed,
}

/// Status of a bet or of one of its selections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
    Void,
}

impl BetStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, BetStatus::Pending)
    }
}

/// Result reported for a selection at settlement time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    Lost,
    Void,
}

impl From<Outcome> for BetStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => BetStatus::Won,
            Outcome::Lost => BetStatus::Lost,
            Outcome::Void => BetStatus::Void,
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "won" | "win" | "w" => Ok(Outcome::Won),
            "lost" | "lose" | "l" => Ok(Outcome::Lost),
            "void" | "v" => Ok(Outcome::Void),
            other => Err(format!("unknown outcome '{}'", other)),
        }
    }
}

/// Capital held by the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bankroll {
    pub id: String,
    pub total_capital: f64,
    pub available_capital: f64, // not committed to a stream
    pub deployed_capital: f64,  // sum of active stream balances
    pub lifetime_profit_loss: f64,
    pub currency: String,
    pub updated_at: DateTime<Utc>,
}

impl Bankroll {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            id: DEFAULT_BANKROLL_ID.to_string(),
            total_capital: 0.0,
            available_capital: 0.0,
            deployed_capital: 0.0,
            lifetime_profit_loss: 0.0,
            currency: currency.into(),
            updated_at: Utc::now(),
        }
    }

    /// total = available + deployed, to the cent
    pub fn is_balanced(&self) -> bool {
        (self.total_capital - (self.available_capital + self.deployed_capital)).abs() < 0.005
    }
}

/// Compounding betting campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: StreamId,
    pub name: String,
    pub initial_stake: f64,
    pub current_balance: f64,
    pub target_daily_odds: f64,
    pub reinvestment_percentage: f64,
    pub cashout_percentage: f64,
    pub current_day: u32,
    pub status: StreamStatus,
    #[serde(default)]
    pub target_balance: Option<f64>,
    #[serde(default)]
    pub target_days: Option<u32>,
    #[serde(default)]
    pub total_cashed_out: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Stream {
    pub fn is_active(&self) -> bool {
        self.status == StreamStatus::Active
    }

    /// Whether the configured balance or day target has been hit
    pub fn target_reached(&self) -> bool {
        let balance_hit = self
            .target_balance
            .map(|t| self.current_balance >= t)
            .unwrap_or(false);
        let days_hit = self
            .target_days
            .map(|d| self.current_day >= d)
            .unwrap_or(false);
        balance_hit || days_hit
    }
}

/// One leg of a bet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub id: SelectionId,
    pub market: String,
    pub odds: f64,
    #[serde(default)]
    pub estimated_probability: Option<f64>,
    #[serde(default)]
    pub league_id: Option<LeagueId>,
    #[serde(default)]
    pub market_type_id: Option<MarketTypeId>,
    pub status: BetStatus,
}

/// Wagered slip belonging to a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: BetId,
    pub stream_id: StreamId,
    pub day: u32,
    pub stake: f64,
    pub total_odds: f64,
    pub status: BetStatus,
    pub returns: Option<f64>,
    pub profit_loss: Option<f64>,
    pub selections: Vec<Selection>,
    pub placed_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl Bet {
    pub fn selection(&self, id: SelectionId) -> Option<&Selection> {
        self.selections.iter().find(|s| s.id == id)
    }
}

/// Running selection hit rate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HitRate {
    pub total_selections: u32,
    pub won_selections: u32,
    pub actual_hit_rate: f64,
}

impl HitRate {
    pub fn record(&mut self, won: bool) {
        self.total_selections += 1;
        if won {
            self.won_selections += 1;
        }
        self.actual_hit_rate = self.won_selections as f64 / self.total_selections as f64;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub country: String,
    pub baseline_probability: f64,
    #[serde(flatten)]
    pub hit_rate: HitRate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketType {
    pub id: MarketTypeId,
    pub name: String,
    pub category: String,
    pub baseline_probability: f64,
    #[serde(flatten)]
    pub hit_rate: HitRate,
}

/// Deposit or withdrawal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStreamRequest {
    pub name: String,
    pub initial_stake: f64,
    pub target_daily_odds: f64,
    pub reinvestment_percentage: f64,
    #[serde(default)]
    pub target_balance: Option<f64>,
    #[serde(default)]
    pub target_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub market: String,
    pub odds: f64,
    #[serde(default)]
    pub estimated_probability: Option<f64>,
    #[serde(default)]
    pub league_id: Option<LeagueId>,
    #[serde(default)]
    pub market_type_id: Option<MarketTypeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceBetRequest {
    pub stake: f64,
    pub selections: Vec<SelectionRequest>,
}

/// Per-selection outcomes keyed by selection id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleBetRequest {
    pub outcomes: BTreeMap<SelectionId, Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KellyRequest {
    pub bankroll: f64,
    pub odds: f64,
    pub win_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub stake: f64,
    pub odds: f64,
    pub reinvestment_fraction: f64,
    pub days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaysToTargetRequest {
    pub current_balance: f64,
    pub target_balance: f64,
    pub odds: f64,
    pub reinvestment_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivalRequest {
    pub win_rate: f64,
    pub days: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivalResponse {
    pub win_rate: f64,
    pub rows: Vec<SurvivalRow>,
}

/// Stream with its bets and the derived display values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamDetail {
    pub stream: Stream,
    pub bets: Vec<Bet>,
    pub streak: Streak,
    pub longest_streaks: StreakRecord,
    pub win_rate: f64,
    pub target_reached: bool,
    pub projection: Vec<ProjectionPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_target: Option<DaysToTarget>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub persistent: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_record() {
        let mut rate = HitRate::default();
        rate.record(true);
        rate.record(false);
        rate.record(true);
        rate.record(true);

        assert_eq!(rate.total_selections, 4);
        assert_eq!(rate.won_selections, 3);
        assert!((rate.actual_hit_rate - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_outcome_from_str() {
        assert_eq!("won".parse::<Outcome>().unwrap(), Outcome::Won);
        assert_eq!("L".parse::<Outcome>().unwrap(), Outcome::Lost);
        assert_eq!(" void ".parse::<Outcome>().unwrap(), Outcome::Void);
        assert!("pending".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_settle_request_deserialization() {
        let req: SettleBetRequest =
            serde_json::from_str(r#"{"outcomes": {"3": "won", "4": "lost"}}"#).unwrap();
        assert_eq!(req.outcomes.get(&3), Some(&Outcome::Won));
        assert_eq!(req.outcomes.get(&4), Some(&Outcome::Lost));
    }

    #[test]
    fn test_league_serialization_flattens_hit_rate() {
        let league = League {
            id: 1,
            name: "Premier League".to_string(),
            country: "England".to_string(),
            baseline_probability: 0.72,
            hit_rate: HitRate {
                total_selections: 10,
                won_selections: 7,
                actual_hit_rate: 0.7,
            },
        };

        let json = serde_json::to_value(&league).unwrap();
        assert_eq!(json["total_selections"], 10);
        assert_eq!(json["won_selections"], 7);

        let back: League = serde_json::from_value(json).unwrap();
        assert_eq!(back, league);
    }

    #[test]
    fn test_stream_target_reached() {
        let now = Utc::now();
        let mut stream = Stream {
            id: 1,
            name: "test".to_string(),
            initial_stake: 50.0,
            current_balance: 50.0,
            target_daily_odds: 1.1,
            reinvestment_percentage: 1.0,
            cashout_percentage: 0.0,
            current_day: 0,
            status: StreamStatus::Active,
            target_balance: Some(100.0),
            target_days: Some(10),
            total_cashed_out: 0.0,
            created_at: now,
            updated_at: now,
        };

        assert!(!stream.target_reached());
        stream.current_balance = 100.0;
        assert!(stream.target_reached());
        stream.current_balance = 60.0;
        stream.current_day = 10;
        assert!(stream.target_reached());
    }
}
