//! Capital movements, stream creation and bet placement

use chrono::Utc;
use tracing::{info, warn};

use super::Ledger;
use crate::core::{accumulator_odds, round_money};
use crate::error::{
    validate_amount, validate_odds, validate_probability, validate_reinvestment, AppError, Result,
};
use crate::models::{
    Bankroll, Bet, BetStatus, CreateStreamRequest, PlaceBetRequest, Selection, Stream, StreamId,
    StreamStatus,
};

/// Tolerance when comparing money amounts
const CENT_TOLERANCE: f64 = 0.005;

impl Ledger {
    /// Add funds to available capital
    pub fn deposit(&mut self, amount: f64) -> Result<&Bankroll> {
        validate_amount("Deposit", amount)?;

        let bankroll = &mut self.bankroll;
        bankroll.available_capital = round_money(bankroll.available_capital + amount);
        bankroll.total_capital = round_money(bankroll.total_capital + amount);
        bankroll.updated_at = Utc::now();

        info!(amount, available = bankroll.available_capital, "deposit");
        Ok(&self.bankroll)
    }

    /// Remove funds from available capital
    pub fn withdraw(&mut self, amount: f64) -> Result<&Bankroll> {
        validate_amount("Withdrawal", amount)?;

        let bankroll = &mut self.bankroll;
        if amount > bankroll.available_capital + CENT_TOLERANCE {
            warn!(amount, available = bankroll.available_capital, "withdrawal rejected");
            return Err(AppError::Conflict(format!(
                "Cannot withdraw {:.2}: only {:.2} available",
                amount, bankroll.available_capital
            )));
        }

        bankroll.available_capital = round_money(bankroll.available_capital - amount);
        bankroll.total_capital = round_money(bankroll.total_capital - amount);
        bankroll.updated_at = Utc::now();

        info!(amount, available = bankroll.available_capital, "withdrawal");
        Ok(&self.bankroll)
    }

    /// Fund a new stream from available capital
    pub fn create_stream(&mut self, req: &CreateStreamRequest) -> Result<&Stream> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Stream name must not be empty".to_string()));
        }
        let stake = round_money(req.initial_stake);
        validate_amount("Initial stake", stake)?;
        validate_odds(req.target_daily_odds)?;
        validate_reinvestment(req.reinvestment_percentage)?;
        if let Some(target) = req.target_balance {
            validate_amount("Target balance", target)?;
        }
        if req.target_days == Some(0) {
            return Err(AppError::Validation("Target days must be at least 1".to_string()));
        }

        if stake > self.bankroll.available_capital + CENT_TOLERANCE {
            return Err(AppError::Conflict(format!(
                "Cannot fund stream with {:.2}: only {:.2} available",
                stake, self.bankroll.available_capital
            )));
        }

        let now = Utc::now();
        let id = self.allocate_id();
        let stream = Stream {
            id,
            name: name.to_string(),
            initial_stake: stake,
            current_balance: stake,
            target_daily_odds: req.target_daily_odds,
            reinvestment_percentage: req.reinvestment_percentage,
            cashout_percentage: 1.0 - req.reinvestment_percentage,
            current_day: 0,
            status: StreamStatus::Active,
            target_balance: req.target_balance,
            target_days: req.target_days,
            total_cashed_out: 0.0,
            created_at: now,
            updated_at: now,
        };
        self.streams.insert(id, stream);

        let bankroll = &mut self.bankroll;
        bankroll.available_capital = round_money(bankroll.available_capital - stake);
        bankroll.deployed_capital = round_money(bankroll.deployed_capital + stake);
        bankroll.updated_at = now;

        info!(stream_id = id, stake, odds = req.target_daily_odds, "stream created");
        self.stream(id)
    }

    /// Stake already committed to pending bets of a stream
    pub fn pending_stake(&self, stream_id: StreamId) -> f64 {
        self.bets
            .values()
            .filter(|b| b.stream_id == stream_id && b.status == BetStatus::Pending)
            .map(|b| b.stake)
            .sum()
    }

    /// Whether a stream has a bet awaiting settlement
    pub fn has_pending_bet(&self, stream_id: StreamId) -> bool {
        self.bets
            .values()
            .any(|b| b.stream_id == stream_id && b.status == BetStatus::Pending)
    }

    /// Place a bet with one or more selections against a stream
    pub fn place_bet(&mut self, stream_id: StreamId, req: &PlaceBetRequest) -> Result<&Bet> {
        let stream = self.stream(stream_id)?;
        if !stream.is_active() {
            return Err(AppError::Conflict(format!(
                "Stream {} is {:?}, bets can only be placed on active streams",
                stream_id, stream.status
            )));
        }

        let stake = round_money(req.stake);
        validate_amount("Stake", stake)?;
        if req.selections.is_empty() {
            return Err(AppError::Validation(
                "A bet needs at least one selection".to_string(),
            ));
        }
        for sel in &req.selections {
            if sel.market.trim().is_empty() {
                return Err(AppError::Validation(
                    "Selection market must not be empty".to_string(),
                ));
            }
            validate_odds(sel.odds)?;
            if let Some(p) = sel.estimated_probability {
                validate_probability(p)?;
            }
            if let Some(league_id) = sel.league_id {
                if !self.leagues.contains_key(&league_id) {
                    return Err(AppError::not_found("League", league_id));
                }
            }
            if let Some(market_type_id) = sel.market_type_id {
                if !self.market_types.contains_key(&market_type_id) {
                    return Err(AppError::not_found("MarketType", market_type_id));
                }
            }
        }

        if self.has_pending_bet(stream_id) {
            return Err(AppError::Conflict(format!(
                "Stream {} already has a pending bet",
                stream_id
            )));
        }
        if stake > stream.current_balance + CENT_TOLERANCE {
            return Err(AppError::Validation(format!(
                "Stake {:.2} exceeds stream balance {:.2}",
                stake, stream.current_balance
            )));
        }
        let day = stream.current_day + 1;

        let selections: Vec<Selection> = req
            .selections
            .iter()
            .map(|sel| Selection {
                id: self.allocate_id(),
                market: sel.market.trim().to_string(),
                odds: sel.odds,
                estimated_probability: sel.estimated_probability,
                league_id: sel.league_id,
                market_type_id: sel.market_type_id,
                status: BetStatus::Pending,
            })
            .collect();
        let total_odds = accumulator_odds(selections.iter().map(|s| s.odds));

        let id = self.allocate_id();
        self.bets.insert(
            id,
            Bet {
                id,
                stream_id,
                day,
                stake,
                total_odds,
                status: BetStatus::Pending,
                returns: None,
                profit_loss: None,
                selections,
                placed_at: Utc::now(),
                settled_at: None,
            },
        );

        info!(bet_id = id, stream_id, stake, total_odds, "bet placed");
        self.bet(id)
    }

    /// Move part of a stream's balance back to available capital
    pub fn cash_out(&mut self, stream_id: StreamId, amount: f64) -> Result<&Stream> {
        validate_amount("Cashout", amount)?;

        let committed = self.pending_stake(stream_id);
        let pending = self.has_pending_bet(stream_id);
        let stream = self.stream_mut(stream_id)?;
        if !stream.is_active() {
            return Err(AppError::Conflict(format!(
                "Stream {} is not active",
                stream_id
            )));
        }
        let free_balance = stream.current_balance - committed;
        if amount > free_balance + CENT_TOLERANCE {
            return Err(AppError::Conflict(format!(
                "Cannot cash out {:.2}: only {:.2} of the stream balance is free",
                amount, free_balance
            )));
        }

        let now = Utc::now();
        stream.current_balance = round_money(stream.current_balance - amount);
        stream.total_cashed_out = round_money(stream.total_cashed_out + amount);
        if stream.current_balance <= 0.0 && !pending {
            stream.current_balance = 0.0;
            stream.status = StreamStatus::Completed;
        }
        stream.updated_at = now;

        let bankroll = &mut self.bankroll;
        bankroll.deployed_capital = round_money(bankroll.deployed_capital - amount);
        bankroll.available_capital = round_money(bankroll.available_capital + amount);
        bankroll.updated_at = now;

        info!(stream_id, amount, "stream cashout");
        self.stream(stream_id)
    }

    /// Close an active stream and release its balance to available capital
    pub fn complete_stream(&mut self, stream_id: StreamId) -> Result<&Stream> {
        let pending = self.has_pending_bet(stream_id);
        let stream = self.stream_mut(stream_id)?;
        if !stream.is_active() {
            return Err(AppError::Conflict(format!(
                "Stream {} is not active",
                stream_id
            )));
        }
        if pending {
            return Err(AppError::Conflict(format!(
                "Stream {} still has pending bets",
                stream_id
            )));
        }

        let now = Utc::now();
        let released = stream.current_balance;
        stream.status = StreamStatus::Completed;
        stream.total_cashed_out = round_money(stream.total_cashed_out + released);
        stream.updated_at = now;

        let bankroll = &mut self.bankroll;
        bankroll.deployed_capital = round_money(bankroll.deployed_capital - released);
        bankroll.available_capital = round_money(bankroll.available_capital + released);
        bankroll.updated_at = now;

        info!(stream_id, released, "stream completed");
        self.stream(stream_id)
    }
}
