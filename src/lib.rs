//! Ski test tournament engine: library with models, tournament logic, storage and config.

pub mod config;
pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    apply_swap, build_round, clear_duel_result, cumulative_score, final_ranking, go_back,
    rank_competitors, record_duel_result, shuffle_seeding, start_tournament, submit_round,
    RankingEntry, RoundOutcome, Slot, SwapOperation,
};
pub use models::{
    Competitor, CompetitorId, Duel, DuelResult, DuelResults, LossEntry, LossPath, MatchId,
    RoundSnapshot, Tournament, TournamentError, TournamentId, TournamentState,
};
