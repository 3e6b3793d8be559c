//! Cumulative scores and final ranking from the loss path.

use crate::models::{Competitor, CompetitorId, LossPath, Tournament, TournamentError, TournamentState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One line of the final ranking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub competitor_id: CompetitorId,
    pub serial_number: String,
    /// Total deficit to the champion. 0 for the champion, lower is better.
    pub cumulative_score: f64,
    /// 1-based position; equal scores share a rank (1, 2, 3, 3, 5).
    pub rank: usize,
}

/// Sum of score diffs along `id -> lost_to -> lost_to ...` until a competitor with no loss.
///
/// Stops at the first competitor already visited, so a malformed (cyclic) loss path
/// contributes nothing past that point instead of looping.
pub fn cumulative_score(id: &str, loss_path: &LossPath) -> f64 {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut total = 0.0;
    let mut current = id;
    while visited.insert(current) {
        match loss_path.get(current) {
            Some(entry) => {
                total += entry.score_diff;
                current = entry.lost_to.as_str();
            }
            None => break,
        }
    }
    total
}

/// Rank competitors ascending by cumulative score. Ties keep seeding order.
pub fn rank_competitors(competitors: &[Competitor], loss_path: &LossPath) -> Vec<RankingEntry> {
    let mut scored: Vec<(&Competitor, f64)> = competitors
        .iter()
        .map(|c| (c, cumulative_score(&c.id, loss_path)))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ranking: Vec<RankingEntry> = Vec::with_capacity(scored.len());
    for (i, (c, score)) in scored.into_iter().enumerate() {
        let rank = match ranking.last() {
            Some(prev) if prev.cumulative_score == score => prev.rank,
            _ => i + 1,
        };
        ranking.push(RankingEntry {
            competitor_id: c.id.clone(),
            serial_number: c.serial_number.clone(),
            cumulative_score: score,
            rank,
        });
    }
    ranking
}

/// Final ranking of a completed tournament.
pub fn final_ranking(tournament: &Tournament) -> Result<Vec<RankingEntry>, TournamentError> {
    if tournament.state != TournamentState::Complete {
        return Err(TournamentError::InvalidState);
    }
    Ok(rank_competitors(&tournament.competitors, &tournament.loss_path))
}
