//! Duel (one head-to-head match slot in a round), its result, and round snapshots.

use crate::models::competitor::{Competitor, CompetitorId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slot index of a duel within its round. Not stable across rounds.
pub type MatchId = usize;

/// Recorded results of the current round, keyed by duel slot.
pub type DuelResults = BTreeMap<MatchId, DuelResult>;

/// One match slot: two competitors, or a single one (bye) who advances without a result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Duel {
    pub id: MatchId,
    pub skis: Vec<Competitor>,
}

impl Duel {
    pub fn new(id: MatchId, skis: Vec<Competitor>) -> Self {
        Self { id, skis }
    }

    /// A bye has a single competitor and needs no recorded result.
    pub fn is_bye(&self) -> bool {
        self.skis.len() < 2
    }

    pub fn contains(&self, id: &str) -> bool {
        self.skis.iter().any(|c| c.id == id)
    }

    /// The other competitor of a two-competitor duel.
    pub fn opponent_of(&self, id: &str) -> Option<&Competitor> {
        match self.skis.as_slice() {
            [a, b] if a.id == id => Some(b),
            [a, b] if b.id == id => Some(a),
            _ => None,
        }
    }

    /// Competitor ids sorted, for order-independent composition checks.
    pub fn id_set(&self) -> Vec<CompetitorId> {
        let mut ids: Vec<_> = self.skis.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids
    }
}

/// Outcome of a duel: who won and by how much.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuelResult {
    pub winner_id: CompetitorId,
    /// Margin between winner and loser (distance or time gap). Never negative.
    #[serde(default)]
    pub diff: f64,
}

impl DuelResult {
    pub fn new(winner_id: impl Into<CompetitorId>, diff: f64) -> Self {
        Self {
            winner_id: winner_id.into(),
            diff,
        }
    }
}

/// A round as it stood when it was left, used for back/forward navigation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round: Vec<Duel>,
    pub duel_results: DuelResults,
    pub round_number: u32,
}

impl RoundSnapshot {
    /// Sorted ids of every competitor in the round.
    pub fn competitor_ids(&self) -> Vec<CompetitorId> {
        let mut ids: Vec<_> = self
            .round
            .iter()
            .flat_map(|d| d.skis.iter().map(|c| c.id.clone()))
            .collect();
        ids.sort();
        ids
    }
}
