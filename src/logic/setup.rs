//! Setup phase: start tournament (transition from Empty to InProgress).

use crate::logic::bracket::build_round;
use crate::models::{Competitor, Tournament, TournamentError, TournamentState};
use std::collections::HashSet;

/// Start the tournament with the selected skis in seeding order: require 2 or more
/// distinct competitors, build round 1 and set state to InProgress.
pub fn start_tournament(
    tournament: &mut Tournament,
    competitors: Vec<Competitor>,
) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Empty {
        return Err(TournamentError::InvalidState);
    }
    if competitors.len() < 2 {
        return Err(TournamentError::NotEnoughCompetitors);
    }
    let mut seen = HashSet::new();
    for c in &competitors {
        if !seen.insert(c.id.as_str()) {
            return Err(TournamentError::DuplicateCompetitor(c.id.clone()));
        }
    }

    tournament.round = build_round(&competitors);
    tournament.competitors = competitors;
    tournament.duel_results.clear();
    tournament.rounds_history.clear();
    tournament.future_rounds.clear();
    tournament.loss_path.clear();
    tournament.round_number = 1;
    tournament.state = TournamentState::InProgress;
    log::info!(
        "Tournament {} started with {} skis in {} duels",
        tournament.id,
        tournament.competitors.len(),
        tournament.round.len()
    );
    Ok(())
}
