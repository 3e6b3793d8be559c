//! Entering duel results for the current round.

use crate::models::{DuelResult, MatchId, Tournament, TournamentError, TournamentState};

/// Set the winner (and optional margin, default 0) for one duel of the current round.
/// Overwrites any earlier result for the same duel.
pub fn record_duel_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner_id: &str,
    diff: Option<f64>,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::InProgress {
        return Err(TournamentError::InvalidState);
    }
    let duel = tournament
        .duel(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if duel.is_bye() || !duel.contains(winner_id) {
        return Err(TournamentError::WinnerNotInMatch {
            match_id,
            winner_id: winner_id.to_string(),
        });
    }
    let diff = diff.unwrap_or(0.0);
    if !diff.is_finite() || diff < 0.0 {
        return Err(TournamentError::InvalidDiff);
    }
    tournament
        .duel_results
        .insert(match_id, DuelResult::new(winner_id, diff));
    Ok(())
}

/// Remove the result of one duel, if any.
pub fn clear_duel_result(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::InProgress {
        return Err(TournamentError::InvalidState);
    }
    if tournament.duel(match_id).is_none() {
        return Err(TournamentError::MatchNotFound(match_id));
    }
    tournament.duel_results.remove(&match_id);
    Ok(())
}
