//! Reseeding during an unsubmitted round: reorder duels or move skis between slots.

use crate::models::{Duel, Tournament, TournamentError, TournamentState};
use serde::{Deserialize, Serialize};

/// A position in the current round: duel index (in round order) and slot within the duel.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub duel_index: usize,
    pub slot_index: usize,
}

/// A drag-and-drop edit of the current round.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwapOperation {
    /// Move a whole duel to another position. Results are untouched.
    ReorderDuel { from: usize, to: usize },
    /// Move one ski onto another slot, swapping with its occupant if there is one.
    MoveCompetitor { source: Slot, dest: Slot },
}

/// Apply a reseeding edit to the current round.
///
/// Only duels whose set of competitor ids changed lose their result; a duel that just had its
/// two skis flipped keeps it.
pub fn apply_swap(tournament: &mut Tournament, op: SwapOperation) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::InProgress {
        return Err(TournamentError::InvalidState);
    }
    match op {
        SwapOperation::ReorderDuel { from, to } => reorder_duel(tournament, from, to),
        SwapOperation::MoveCompetitor { source, dest } => move_competitor(tournament, source, dest),
    }
}

fn reorder_duel(tournament: &mut Tournament, from: usize, to: usize) -> Result<(), TournamentError> {
    let len = tournament.round.len();
    if from >= len || to >= len {
        return Err(TournamentError::InvalidSwap);
    }
    let duel = tournament.round.remove(from);
    tournament.round.insert(to, duel);
    Ok(())
}

fn move_competitor(tournament: &mut Tournament, source: Slot, dest: Slot) -> Result<(), TournamentError> {
    let round = &tournament.round;
    let (Some(src_duel), Some(dest_duel)) = (round.get(source.duel_index), round.get(dest.duel_index)) else {
        return Err(TournamentError::InvalidSwap);
    };
    // The source slot must hold a ski; the destination may be the free slot of a bye.
    if source.slot_index >= src_duel.skis.len()
        || dest.slot_index > dest_duel.skis.len()
        || dest.slot_index >= 2
    {
        return Err(TournamentError::InvalidSwap);
    }
    if source == dest {
        return Ok(());
    }

    let mut before: Vec<Duel> = vec![src_duel.clone()];
    if dest.duel_index != source.duel_index {
        before.push(dest_duel.clone());
    }

    let round = &mut tournament.round;
    if source.duel_index == dest.duel_index {
        let skis = &mut round[source.duel_index].skis;
        if dest.slot_index < skis.len() {
            skis.swap(source.slot_index, dest.slot_index);
        }
    } else if dest.slot_index < round[dest.duel_index].skis.len() {
        let moving = round[source.duel_index].skis[source.slot_index].clone();
        let displaced = std::mem::replace(&mut round[dest.duel_index].skis[dest.slot_index], moving);
        round[source.duel_index].skis[source.slot_index] = displaced;
    } else {
        let moving = round[source.duel_index].skis.remove(source.slot_index);
        round[dest.duel_index].skis.push(moving);
    }

    let changed: Vec<Duel> = before
        .into_iter()
        .filter(|old| {
            tournament
                .duel(old.id)
                .map_or(true, |new| new.id_set() != old.id_set())
        })
        .collect();
    for old in &changed {
        discard_result(tournament, old);
    }
    tournament.round.retain(|d| !d.skis.is_empty());
    Ok(())
}

/// Drop the result of a duel whose line-up changed. If that result had already been folded
/// into the loss path (a round reopened by going back), drop the loser's entry too.
fn discard_result(tournament: &mut Tournament, old: &Duel) {
    let Some(result) = tournament.duel_results.remove(&old.id) else {
        return;
    };
    log::debug!(
        "Tournament {}: line-up of duel {} changed, result discarded",
        tournament.id,
        old.id
    );
    if let Some(loser) = old.opponent_of(&result.winner_id) {
        let folded = tournament
            .loss_path
            .get(&loser.id)
            .is_some_and(|e| e.lost_to == result.winner_id);
        if folded {
            tournament.loss_path.remove(&loser.id);
        }
    }
}
