use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Loss,
}

/// Ledger entry for a resolved round. Never modified after creation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundRecord {
    pub id: u32,
    pub bet_amount: Amount,
    pub mine_count: u8,
    pub result: RoundResult,
    pub profit: Amount,
    /// Zero for a lost round.
    pub multiplier: Multiplier,
    #[serde(alias = "tiles")]
    pub tiles_revealed: TileCount,
}

impl RoundRecord {
    pub const fn is_win(&self) -> bool {
        matches!(self.result, RoundResult::Win)
    }
}

/// Resolved rounds, newest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: VecDeque<RoundRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&RoundRecord> {
        self.records.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoundRecord> {
        self.records.iter()
    }

    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &RoundRecord> {
        self.records.iter().take(limit)
    }

    pub(crate) fn record_win(
        &mut self,
        bet_amount: Amount,
        mine_count: u8,
        multiplier: Multiplier,
        tiles_revealed: TileCount,
    ) -> RoundRecord {
        self.push(RoundRecord {
            id: self.next_id(),
            bet_amount,
            mine_count,
            result: RoundResult::Win,
            profit: multiplier::profit(bet_amount, multiplier),
            multiplier,
            tiles_revealed,
        })
    }

    pub(crate) fn record_loss(
        &mut self,
        bet_amount: Amount,
        mine_count: u8,
        tiles_revealed: TileCount,
    ) -> RoundRecord {
        self.push(RoundRecord {
            id: self.next_id(),
            bet_amount,
            mine_count,
            result: RoundResult::Loss,
            profit: -bet_amount,
            multiplier: 0.0,
            tiles_revealed,
        })
    }

    pub fn stats(&self) -> HistoryStats {
        let mut stats = HistoryStats::default();
        for record in &self.records {
            stats.rounds += 1;
            match record.result {
                RoundResult::Win => stats.wins += 1,
                RoundResult::Loss => stats.losses += 1,
            }
            stats.net_profit += record.profit;
            if record.multiplier > stats.best_multiplier {
                stats.best_multiplier = record.multiplier;
            }
        }
        stats
    }

    /// Ids are sequential because records are only ever prepended.
    fn next_id(&self) -> u32 {
        u32::try_from(self.records.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }

    fn push(&mut self, record: RoundRecord) -> RoundRecord {
        self.records.push_front(record);
        record
    }

    /// Ids must count down by one from the newest entry to 1.
    pub(crate) fn is_consistent(&self) -> bool {
        self.records
            .iter()
            .rev()
            .enumerate()
            .all(|(i, record)| usize::try_from(record.id).is_ok_and(|id| id == i + 1))
    }
}

/// Aggregate figures over the whole history.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct HistoryStats {
    pub rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub net_profit: Amount,
    pub best_multiplier: Multiplier,
}

impl HistoryStats {
    /// Share of won rounds in percent.
    pub fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            f64::from(self.wins) * 100.0 / f64::from(self.rounds)
        }
    }
}
