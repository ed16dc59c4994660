//! Streaks, win rate and survival probability

use serde::{Deserialize, Serialize};

use crate::models::BetStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakKind {
    Win,
    Lose,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub count: u32,
    pub kind: StreakKind,
}

impl Streak {
    pub const NONE: Streak = Streak {
        count: 0,
        kind: StreakKind::None,
    };
}

/// Longest runs seen over a history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakRecord {
    pub longest_win: u32,
    pub longest_lose: u32,
}

/// Row of a survival table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalRow {
    pub days: u32,
    pub probability: f64,
}

fn settled_kind(status: BetStatus) -> Option<StreakKind> {
    match status {
        BetStatus::Won => Some(StreakKind::Win),
        BetStatus::Lost => Some(StreakKind::Lose),
        BetStatus::Pending | BetStatus::Void => None,
    }
}

/// Current streak of a time-ordered (oldest first) outcome history
///
/// Pending and void bets are skipped.
pub fn current_streak<I>(outcomes: I) -> Streak
where
    I: IntoIterator<Item = BetStatus>,
    I::IntoIter: DoubleEndedIterator,
{
    let mut settled = outcomes.into_iter().rev().filter_map(settled_kind);

    let kind = match settled.next() {
        Some(k) => k,
        None => return Streak::NONE,
    };

    let count = 1 + settled.take_while(|k| *k == kind).count() as u32;
    Streak { count, kind }
}

/// Longest win and losing runs of a time-ordered outcome history
pub fn longest_streaks<I>(outcomes: I) -> StreakRecord
where
    I: IntoIterator<Item = BetStatus>,
{
    let mut record = StreakRecord::default();
    let mut run: Option<(StreakKind, u32)> = None;

    for kind in outcomes.into_iter().filter_map(settled_kind) {
        let len = match run {
            Some((k, n)) if k == kind => n + 1,
            _ => 1,
        };
        run = Some((kind, len));

        match kind {
            StreakKind::Win => record.longest_win = record.longest_win.max(len),
            StreakKind::Lose => record.longest_lose = record.longest_lose.max(len),
            StreakKind::None => {}
        }
    }

    record
}

/// Share of settled (won or lost) bets that won; 0 when nothing is settled
pub fn win_rate<I>(outcomes: I) -> f64
where
    I: IntoIterator<Item = BetStatus>,
{
    let (won, settled) = outcomes
        .into_iter()
        .filter_map(settled_kind)
        .fold((0u32, 0u32), |(w, n), k| {
            (w + u32::from(k == StreakKind::Win), n + 1)
        });

    if settled == 0 {
        0.0
    } else {
        won as f64 / settled as f64
    }
}

/// Probability of winning `days` consecutive days at `win_rate`
pub fn survival_probability(win_rate: f64, days: u32) -> f64 {
    win_rate.clamp(0.0, 1.0).powf(f64::from(days))
}

/// Survival probability for each requested horizon
pub fn survival_table(win_rate: f64, days: &[u32]) -> Vec<SurvivalRow> {
    days.iter()
        .map(|&d| SurvivalRow {
            days: d,
            probability: survival_probability(win_rate, d),
        })
        .collect()
}
