//! Tournament engine: setup, bracket building, results, rounds, reseeding and scoring.

mod bracket;
mod reseed;
mod results;
mod rounds;
mod scoring;
mod seeding;
mod setup;

pub use bracket::build_round;
pub use reseed::{apply_swap, Slot, SwapOperation};
pub use results::{clear_duel_result, record_duel_result};
pub use rounds::{go_back, submit_round, RoundOutcome};
pub use scoring::{cumulative_score, final_ranking, rank_competitors, RankingEntry};
pub use seeding::shuffle_seeding;
pub use setup::start_tournament;
