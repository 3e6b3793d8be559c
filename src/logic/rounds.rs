//! Round progression: submit the current round, go back to an earlier one.

use crate::logic::bracket::build_round;
use crate::models::{
    Competitor, CompetitorId, Duel, DuelResult, LossEntry, Tournament, TournamentError,
    TournamentState,
};

/// What happened when a round was submitted.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundOutcome {
    /// A next round is ready. `restored` is true when it came back from the future-rounds
    /// cache with its results intact.
    Advanced { round_number: u32, restored: bool },
    /// Only one competitor remains.
    Complete { champion: CompetitorId },
}

/// Winner and loser of a two-competitor duel, if the result names one of its competitors.
fn winner_and_loser<'a>(duel: &'a Duel, result: &DuelResult) -> Option<(&'a Competitor, &'a Competitor)> {
    match duel.skis.as_slice() {
        [a, b] if a.id == result.winner_id => Some((a, b)),
        [a, b] if b.id == result.winner_id => Some((b, a)),
        _ => None,
    }
}

/// Submit the current round.
///
/// 1. Every two-competitor duel must have a winner who is one of its competitors; otherwise
///    fail with `IncompleteRound` listing all open duels and change nothing.
/// 2. Fold each loser into the loss path and collect survivors (winners and byes) in duel order.
/// 3. Push the submitted round onto `rounds_history`.
/// 4. One survivor: Complete. Otherwise reuse a cached future round with exactly the same
///    competitors, or build a fresh one.
pub fn submit_round(tournament: &mut Tournament) -> Result<RoundOutcome, TournamentError> {
    if tournament.state != TournamentState::InProgress {
        return Err(TournamentError::InvalidState);
    }

    let mut missing = Vec::new();
    let mut losses: Vec<(CompetitorId, LossEntry)> = Vec::new();
    let mut survivors: Vec<Competitor> = Vec::new();
    for duel in &tournament.round {
        if duel.is_bye() {
            survivors.extend(duel.skis.iter().cloned());
            continue;
        }
        let decided = tournament
            .duel_results
            .get(&duel.id)
            .and_then(|r| winner_and_loser(duel, r).map(|(w, l)| (w, l, r.diff)));
        match decided {
            Some((_, _, diff)) if !diff.is_finite() || diff < 0.0 => {
                return Err(TournamentError::InvalidDiff);
            }
            Some((winner, loser, diff)) => {
                losses.push((
                    loser.id.clone(),
                    LossEntry {
                        lost_to: winner.id.clone(),
                        score_diff: diff,
                    },
                ));
                survivors.push(winner.clone());
            }
            None => missing.push(duel.id),
        }
    }
    if !missing.is_empty() {
        return Err(TournamentError::IncompleteRound { missing });
    }
    let next_number = match tournament.round_number.checked_add(1) {
        Some(n) => n,
        None if survivors.len() > 1 => return Err(TournamentError::InvalidState),
        None => tournament.round_number,
    };

    // A survivor may carry an entry from a path that was undone and replayed differently.
    for s in &survivors {
        tournament.loss_path.remove(&s.id);
    }
    tournament.loss_path.extend(losses);
    let submitted = tournament.current_snapshot();
    tournament.rounds_history.push(submitted);

    if let [champion] = survivors.as_slice() {
        log::info!(
            "Tournament {} complete after round {}: champion {}",
            tournament.id,
            tournament.round_number,
            champion.serial_number
        );
        tournament.round.clear();
        tournament.duel_results.clear();
        tournament.state = TournamentState::Complete;
        return Ok(RoundOutcome::Complete {
            champion: champion.id.clone(),
        });
    }

    let mut next_ids: Vec<_> = survivors.iter().map(|c| c.id.clone()).collect();
    next_ids.sort();
    let cached = tournament
        .future_rounds
        .iter()
        .position(|s| s.round_number == next_number && s.competitor_ids() == next_ids);

    let restored = match cached {
        Some(pos) => {
            let snapshot = tournament.future_rounds.remove(pos);
            tournament.restore(snapshot);
            true
        }
        None => {
            // Cached rounds from here on were built from a different field.
            tournament
                .future_rounds
                .retain(|s| s.round_number < next_number);
            tournament.round = build_round(&survivors);
            tournament.duel_results.clear();
            tournament.round_number = next_number;
            false
        }
    };
    log::debug!(
        "Tournament {} advanced to round {} ({} skis, restored: {})",
        tournament.id,
        next_number,
        survivors.len(),
        restored
    );
    Ok(RoundOutcome::Advanced {
        round_number: next_number,
        restored,
    })
}

/// Return to the most recently submitted round, restoring its duels and results.
///
/// The round being left is cached in `future_rounds` so replaying the earlier round identically
/// brings it back. Loss path entries already folded in are not retracted here.
pub fn go_back(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state == TournamentState::Empty {
        return Err(TournamentError::InvalidState);
    }
    let previous = tournament
        .rounds_history
        .pop()
        .ok_or(TournamentError::NoPreviousRound)?;

    if tournament.state == TournamentState::InProgress {
        let leaving = tournament.current_snapshot();
        tournament
            .future_rounds
            .retain(|s| s.round_number != leaving.round_number);
        tournament.future_rounds.push(leaving);
    }
    tournament.restore(previous);
    tournament.state = TournamentState::InProgress;
    log::debug!(
        "Tournament {} went back to round {}",
        tournament.id,
        tournament.round_number
    );
    Ok(())
}
