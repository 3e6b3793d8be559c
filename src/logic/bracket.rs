//! Bracket building: pair an ordered competitor list into one round of duels.

use crate::models::{Competitor, Duel};

/// Pair competitors in order: duel i gets competitors 2i and 2i+1.
///
/// An odd trailing competitor gets a bye (a single-competitor duel). Order is kept exactly
/// as given so seeding stays deterministic. Empty input gives an empty round; callers guard
/// against starting with fewer than 2 competitors.
pub fn build_round(competitors: &[Competitor]) -> Vec<Duel> {
    competitors
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| Duel::new(i, pair.to_vec()))
        .collect()
}
