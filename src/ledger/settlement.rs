//! Bet settlement
//!
//! A pending bet is settled exactly once from the outcome of each of its
//! selections. Settlement updates the bet, its stream, the bankroll and the
//! league / market type hit rates together; every check runs before the
//! first write so a rejected settlement leaves the ledger untouched.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::Ledger;
use crate::core::round_money;
use crate::error::{AppError, Result};
use crate::models::{Bankroll, Bet, BetId, BetStatus, Outcome, SelectionId, Stream, StreamStatus};

/// State of the touched records after a settlement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub bet: Bet,
    pub stream: Stream,
    pub bankroll: Bankroll,
}

/// Overall result of an accumulator from its legs
///
/// Any lost leg loses the bet. Void legs are neutral: the bet is won when
/// the remaining legs all won, and void only when every leg is void.
pub fn resolve_bet_status<I>(outcomes: I) -> BetStatus
where
    I: IntoIterator<Item = Outcome>,
{
    let mut any_won = false;
    for outcome in outcomes {
        match outcome {
            Outcome::Lost => return BetStatus::Lost,
            Outcome::Won => any_won = true,
            Outcome::Void => {}
        }
    }
    if any_won {
        BetStatus::Won
    } else {
        BetStatus::Void
    }
}

impl Ledger {
    /// Settle a pending bet
    ///
    /// `outcomes` must name every selection of the bet and nothing else.
    pub fn settle_bet(
        &mut self,
        bet_id: BetId,
        outcomes: &BTreeMap<SelectionId, Outcome>,
    ) -> Result<SettlementReport> {
        let bet = self.bet(bet_id)?;
        if bet.status.is_settled() {
            warn!(bet_id, status = ?bet.status, "bet already settled");
            return Err(AppError::Conflict(format!(
                "Bet {} is already settled as {:?}",
                bet_id, bet.status
            )));
        }

        if let Some(unknown) = outcomes.keys().find(|id| bet.selection(**id).is_none()) {
            return Err(AppError::not_found("Selection", *unknown));
        }
        let missing: Vec<SelectionId> = bet
            .selections
            .iter()
            .filter(|s| !outcomes.contains_key(&s.id))
            .map(|s| s.id)
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing outcome for selections {:?}",
                missing
            )));
        }

        let stream_id = bet.stream_id;
        let stake = bet.stake;
        let status = resolve_bet_status(bet.selections.iter().map(|s| outcomes[&s.id]));
        let effective_odds: f64 = bet
            .selections
            .iter()
            .filter(|s| outcomes[&s.id] == Outcome::Won)
            .map(|s| s.odds)
            .product();

        let stream = self.stream(stream_id)?;
        if !stream.is_active() {
            return Err(AppError::Conflict(format!(
                "Stream {} is not active",
                stream_id
            )));
        }
        let balance_before = stream.current_balance;

        let (returns, profit_loss) = match status {
            BetStatus::Won => {
                let returns = round_money(stake * effective_odds);
                (returns, round_money(returns - stake))
            }
            BetStatus::Lost => (0.0, -stake),
            _ => (stake, 0.0),
        };

        // Checks done; apply.
        let now = Utc::now();

        let stream = self.stream_mut(stream_id)?;
        match status {
            BetStatus::Won => {
                stream.current_balance = round_money(balance_before - stake + returns);
                stream.current_day += 1;
            }
            BetStatus::Lost => {
                stream.current_balance = 0.0;
                stream.status = StreamStatus::Failed;
                stream.current_day += 1;
            }
            _ => {}
        }
        stream.updated_at = now;

        let bankroll = &mut self.bankroll;
        match status {
            BetStatus::Won => {
                bankroll.deployed_capital = round_money(bankroll.deployed_capital + profit_loss);
            }
            BetStatus::Lost => {
                // The unstaked remainder of a failed stream goes back to available
                let released = round_money(balance_before - stake);
                bankroll.deployed_capital = round_money(bankroll.deployed_capital - balance_before);
                bankroll.available_capital = round_money(bankroll.available_capital + released);
            }
            _ => {}
        }
        bankroll.total_capital = round_money(bankroll.total_capital + profit_loss);
        bankroll.lifetime_profit_loss = round_money(bankroll.lifetime_profit_loss + profit_loss);
        bankroll.updated_at = now;

        let mut counted: Vec<(Option<u64>, Option<u64>, bool)> = Vec::new();
        if let Some(bet) = self.bets.get_mut(&bet_id) {
            for selection in &mut bet.selections {
                let outcome = outcomes[&selection.id];
                selection.status = outcome.into();
                if outcome != Outcome::Void {
                    counted.push((
                        selection.league_id,
                        selection.market_type_id,
                        outcome == Outcome::Won,
                    ));
                }
            }
            bet.status = status;
            bet.returns = Some(returns);
            bet.profit_loss = Some(profit_loss);
            bet.settled_at = Some(now);
        }

        for (league_id, market_type_id, won) in counted {
            if let Some(league) = league_id.and_then(|id| self.leagues.get_mut(&id)) {
                league.hit_rate.record(won);
            }
            if let Some(market) = market_type_id.and_then(|id| self.market_types.get_mut(&id)) {
                market.hit_rate.record(won);
            }
        }

        info!(
            bet_id,
            stream_id,
            status = ?status,
            returns,
            profit_loss,
            "bet settled"
        );

        Ok(SettlementReport {
            bet: self.bet(bet_id)?.clone(),
            stream: self.stream(stream_id)?.clone(),
            bankroll: self.bankroll.clone(),
        })
    }
}
