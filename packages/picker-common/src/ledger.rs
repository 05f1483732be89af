use std::collections::BTreeMap;

use cosmwasm_std::Decimal;

use crate::types::{PenaltyPolicy, StatEntry};

/// Probability multipliers applied to a participant's next draw.
///
/// An absent entry means no penalty (1.0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PenaltyTable {
    entries: BTreeMap<String, Decimal>,
}

impl PenaltyTable {
    pub fn from_entries<I: IntoIterator<Item = (String, Decimal)>>(entries: I) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Decimal {
        self.entries.get(name).copied().unwrap_or(Decimal::one())
    }

    /// Overwrite the multiplier for `name`.
    pub fn set_next_penalty(&mut self, name: &str, factor: Decimal) {
        self.entries.insert(name.to_string(), factor);
    }

    /// Write the winner's penalty after a draw, honoring the configured policy.
    pub fn apply_draw(&mut self, winner: &str, factor: Decimal, policy: &PenaltyPolicy) {
        if *policy == PenaltyPolicy::ClearAfterDraw {
            self.entries.clear();
        }
        self.set_next_penalty(winner, factor);
    }

    pub fn is_penalized(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .map(|factor| *factor < Decimal::one())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(name, factor)| (name.as_str(), *factor))
    }

    pub fn to_pairs(&self) -> Vec<(String, Decimal)> {
        self.entries
            .iter()
            .map(|(name, factor)| (name.clone(), *factor))
            .collect()
    }
}

/// Lifetime win counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsLedger {
    wins: BTreeMap<String, u32>,
}

impl StatsLedger {
    pub fn from_entries<I: IntoIterator<Item = (String, u32)>>(entries: I) -> Self {
        Self {
            wins: entries.into_iter().collect(),
        }
    }

    pub fn record_win(&mut self, name: &str) {
        let wins = self.wins.entry(name.to_string()).or_insert(0);
        *wins = wins.saturating_add(1);
    }

    pub fn wins(&self, name: &str) -> u32 {
        self.wins.get(name).copied().unwrap_or(0)
    }

    pub fn total_wins(&self) -> u64 {
        self.wins.values().map(|w| *w as u64).sum()
    }

    /// Share of all recorded wins held by `name`. Zero when nothing is recorded.
    pub fn win_rate(&self, name: &str) -> Decimal {
        let total = self.total_wins();
        if total == 0 {
            return Decimal::zero();
        }
        Decimal::from_ratio(self.wins(name) as u64, total)
    }

    /// Destructive: drops every entry.
    pub fn reset(&mut self) {
        self.wins.clear();
    }

    /// Entries by descending win count, ties by name.
    pub fn ranked(&self) -> Vec<StatEntry> {
        let mut entries: Vec<StatEntry> = self
            .wins
            .iter()
            .map(|(name, wins)| StatEntry {
                name: name.clone(),
                wins: *wins,
                win_rate: self.win_rate(name),
            })
            .collect();
        // BTreeMap iteration is already name-ordered; a stable sort keeps that for ties.
        entries.sort_by(|a, b| b.wins.cmp(&a.wins));
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.wins.is_empty()
    }

    pub fn to_pairs(&self) -> Vec<(String, u32)> {
        self.wins
            .iter()
            .map(|(name, wins)| (name.clone(), *wins))
            .collect()
    }
}
