//! Optional random seeding before the first round is built.

use crate::models::Competitor;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle the seeding order in place. The bracket builder itself never shuffles.
pub fn shuffle_seeding<R: Rng + ?Sized>(competitors: &mut [Competitor], rng: &mut R) {
    competitors.shuffle(rng);
}
