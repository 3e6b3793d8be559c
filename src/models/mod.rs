//! Data structures for a ski test tournament: competitors, duels, tournament state.

mod competitor;
mod duel;
mod tournament;

pub use competitor::{Competitor, CompetitorId};
pub use duel::{Duel, DuelResult, DuelResults, MatchId, RoundSnapshot};
pub use tournament::{
    LossEntry, LossPath, Tournament, TournamentError, TournamentId, TournamentState,
};
