//! Competitor: a pair of skis entered into a tournament.

use serde::{Deserialize, Serialize};

/// Identifier of a competitor, as assigned by the ski inventory.
pub type CompetitorId = String;

/// A pair of skis in the tournament. Treated as immutable while a tournament runs.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    /// Display label printed on the skis.
    pub serial_number: String,
}

impl Competitor {
    pub fn new(id: impl Into<CompetitorId>, serial_number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            serial_number: serial_number.into(),
        }
    }
}
