//! Shared helpers for integration tests.

#![allow(dead_code)]

use ski_tournament::{start_tournament, Competitor, Tournament};

/// Competitors whose id and serial number are both the given label.
pub fn skis(labels: &[&str]) -> Vec<Competitor> {
    labels.iter().map(|l| Competitor::new(*l, *l)).collect()
}

/// A started tournament with the given skis in seeding order.
pub fn tournament_with(labels: &[&str]) -> Tournament {
    let mut t = Tournament::new();
    start_tournament(&mut t, skis(labels)).unwrap();
    t
}

/// Ids of each duel in the current round, in round order.
pub fn line_up(t: &Tournament) -> Vec<Vec<String>> {
    t.round
        .iter()
        .map(|d| d.skis.iter().map(|c| c.id.clone()).collect())
        .collect()
}
