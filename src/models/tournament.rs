//! Tournament working state, the loss graph, and TournamentState.

use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::duel::{Duel, DuelResults, MatchId, RoundSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Not every two-competitor duel has a winner. Lists the duels still open.
    IncompleteRound { missing: Vec<MatchId> },
    /// Need at least 2 competitors to start.
    NotEnoughCompetitors,
    /// The same competitor id was selected twice.
    DuplicateCompetitor(CompetitorId),
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// No duel with this id in the current round.
    MatchNotFound(MatchId),
    /// The winner is not one of the duel's two competitors (or the duel is a bye).
    WinnerNotInMatch { match_id: MatchId, winner_id: CompetitorId },
    /// Score diff must be a finite, non-negative number.
    InvalidDiff,
    /// There is no earlier round to go back to.
    NoPreviousRound,
    /// A swap referenced a duel or slot that does not exist.
    InvalidSwap,
    /// A saved working state could not be read or is inconsistent.
    InvalidCheckpoint(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::IncompleteRound { missing } => {
                write!(f, "Not all duels have a winner ({} missing)", missing.len())
            }
            TournamentError::NotEnoughCompetitors => write!(f, "Need at least 2 skis to start a test"),
            TournamentError::DuplicateCompetitor(id) => write!(f, "Ski {} was selected more than once", id),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::MatchNotFound(id) => write!(f, "Duel {} not found in the current round", id),
            TournamentError::WinnerNotInMatch { match_id, winner_id } => {
                write!(f, "Ski {} is not competing in duel {}", winner_id, match_id)
            }
            TournamentError::InvalidDiff => write!(f, "Score diff must be a non-negative number"),
            TournamentError::NoPreviousRound => write!(f, "Already at the first round"),
            TournamentError::InvalidSwap => write!(f, "Swap refers to a duel or slot that does not exist"),
            TournamentError::InvalidCheckpoint(reason) => write!(f, "Saved tournament is invalid: {}", reason),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Who eliminated a competitor and by how much. One entry per eliminated competitor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LossEntry {
    pub lost_to: CompetitorId,
    pub score_diff: f64,
}

/// Loser id -> the duel that eliminated them. Edges point from loser to winner.
pub type LossPath = BTreeMap<CompetitorId, LossEntry>;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// No skis selected yet.
    #[default]
    Empty,
    /// Rounds are being played.
    InProgress,
    /// One ski remains: the champion.
    Complete,
}

/// Full working state of one tournament. Ephemeral: discarded once rankings are submitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    /// Every competitor, in seeding order.
    pub competitors: Vec<Competitor>,
    /// Current round's duels.
    pub round: Vec<Duel>,
    /// Current round: results entered so far (before submit).
    pub duel_results: DuelResults,
    /// Submitted rounds, most recent last.
    pub rounds_history: Vec<RoundSnapshot>,
    /// Rounds left by going back, kept so an identical replay picks them up again.
    pub future_rounds: Vec<RoundSnapshot>,
    pub loss_path: LossPath,
    /// 1-based number of the current round.
    pub round_number: u32,
    pub state: TournamentState,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new()
    }
}

impl Tournament {
    /// Create a new tournament in Empty state with no competitors.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            competitors: Vec::new(),
            round: Vec::new(),
            duel_results: DuelResults::new(),
            rounds_history: Vec::new(),
            future_rounds: Vec::new(),
            loss_path: LossPath::new(),
            round_number: 0,
            state: TournamentState::Empty,
        }
    }

    /// Look up a duel of the current round by id.
    pub fn duel(&self, match_id: MatchId) -> Option<&Duel> {
        self.round.iter().find(|d| d.id == match_id)
    }

    /// The current round as a snapshot.
    pub fn current_snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            round: self.round.clone(),
            duel_results: self.duel_results.clone(),
            round_number: self.round_number,
        }
    }

    /// Make `snapshot` the current round.
    pub fn restore(&mut self, snapshot: RoundSnapshot) {
        self.round = snapshot.round;
        self.duel_results = snapshot.duel_results;
        self.round_number = snapshot.round_number;
    }

    /// The sole competitor without a loss, once the tournament is complete.
    pub fn champion(&self) -> Option<&Competitor> {
        if self.state != TournamentState::Complete {
            return None;
        }
        self.competitors
            .iter()
            .find(|c| !self.loss_path.contains_key(&c.id))
    }

    /// Serialize the whole working state (for resuming after a reload).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a working state produced by [`Tournament::to_json`]. The state is validated.
    pub fn from_json(s: &str) -> Result<Self, TournamentError> {
        let tournament: Self =
            serde_json::from_str(s).map_err(|e| TournamentError::InvalidCheckpoint(e.to_string()))?;
        tournament.validate()?;
        Ok(tournament)
    }

    /// Check that a working state could have been produced by playing the tournament:
    /// well-formed rounds over known skis, valid results and margins, round numbers that
    /// agree with the history, and a phase that agrees with the current round.
    pub fn validate(&self) -> Result<(), TournamentError> {
        let invalid = |reason: String| Err(TournamentError::InvalidCheckpoint(reason));

        if self.state == TournamentState::Empty {
            let untouched = self.competitors.is_empty()
                && self.round.is_empty()
                && self.duel_results.is_empty()
                && self.rounds_history.is_empty()
                && self.future_rounds.is_empty()
                && self.loss_path.is_empty()
                && self.round_number == 0;
            if !untouched {
                return invalid("an empty tournament carries round data".into());
            }
            return Ok(());
        }

        if self.competitors.len() < 2 {
            return Err(TournamentError::NotEnoughCompetitors);
        }
        let mut known = HashSet::new();
        for c in &self.competitors {
            if !known.insert(c.id.as_str()) {
                return Err(TournamentError::DuplicateCompetitor(c.id.clone()));
            }
        }
        if self.round_number == 0 || self.round_number == u32::MAX {
            return invalid(format!("round number {} is out of range", self.round_number));
        }

        // Submitted rounds are numbered 1, 2, ... in order.
        for (i, snapshot) in self.rounds_history.iter().enumerate() {
            if snapshot.round_number as usize != i + 1 {
                return invalid(format!("history entry {} has round number {}", i, snapshot.round_number));
            }
            check_round(snapshot, &known)?;
        }
        match self.state {
            TournamentState::InProgress => {
                if self.round.is_empty() {
                    return invalid("a tournament in progress has no duels".into());
                }
                if self.round_number as usize != self.rounds_history.len() + 1 {
                    return invalid(format!(
                        "round {} follows {} submitted rounds",
                        self.round_number,
                        self.rounds_history.len()
                    ));
                }
                check_round(&self.current_snapshot(), &known)?;
            }
            TournamentState::Complete => {
                if !self.round.is_empty() || !self.duel_results.is_empty() {
                    return invalid("a complete tournament still has an open round".into());
                }
                if self.round_number as usize != self.rounds_history.len() {
                    return invalid(format!(
                        "final round {} but {} submitted rounds",
                        self.round_number,
                        self.rounds_history.len()
                    ));
                }
            }
            TournamentState::Empty => {}
        }
        for snapshot in &self.future_rounds {
            if snapshot.round_number <= self.round_number {
                return invalid(format!("cached round {} is not ahead of the current round", snapshot.round_number));
            }
            check_round(snapshot, &known)?;
        }

        for (loser, entry) in &self.loss_path {
            if !known.contains(loser.as_str()) || !known.contains(entry.lost_to.as_str()) {
                return invalid(format!("loss of {} refers to an unknown ski", loser));
            }
            if *loser == entry.lost_to {
                return invalid(format!("{} lost to itself", loser));
            }
            if !entry.score_diff.is_finite() || entry.score_diff < 0.0 {
                return Err(TournamentError::InvalidDiff);
            }
        }
        if self.state == TournamentState::Complete {
            let unbeaten = self
                .competitors
                .iter()
                .filter(|c| !self.loss_path.contains_key(&c.id))
                .count();
            if unbeaten != 1 {
                return invalid(format!("a complete tournament has {} unbeaten skis", unbeaten));
            }
        }
        Ok(())
    }
}

/// One round: duels of 1 or 2 known skis, each ski at most once, distinct duel ids, and
/// results only for two-ski duels with a competing winner and a valid margin.
fn check_round(snapshot: &RoundSnapshot, known: &HashSet<&str>) -> Result<(), TournamentError> {
    let invalid = |reason: String| Err(TournamentError::InvalidCheckpoint(reason));
    let mut seen = HashSet::new();
    let mut ids = HashSet::new();
    for duel in &snapshot.round {
        if !ids.insert(duel.id) {
            return invalid(format!("round {} has two duels with id {}", snapshot.round_number, duel.id));
        }
        if duel.skis.is_empty() || duel.skis.len() > 2 {
            return invalid(format!("duel {} has {} skis", duel.id, duel.skis.len()));
        }
        for c in &duel.skis {
            if !known.contains(c.id.as_str()) {
                return invalid(format!("ski {} is not entered in the tournament", c.id));
            }
            if !seen.insert(c.id.as_str()) {
                return Err(TournamentError::DuplicateCompetitor(c.id.clone()));
            }
        }
    }
    for (match_id, result) in &snapshot.duel_results {
        let duel = snapshot
            .round
            .iter()
            .find(|d| d.id == *match_id)
            .ok_or(TournamentError::MatchNotFound(*match_id))?;
        if duel.is_bye() || !duel.contains(&result.winner_id) {
            return Err(TournamentError::WinnerNotInMatch {
                match_id: *match_id,
                winner_id: result.winner_id.clone(),
            });
        }
        if !result.diff.is_finite() || result.diff < 0.0 {
            return Err(TournamentError::InvalidDiff);
        }
    }
    Ok(())
}
