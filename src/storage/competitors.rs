//! Competitor source: the ordered ski list selected for a test, as CSV.

use crate::models::Competitor;
use std::io::Read;

/// Parse `id,serial_number` rows (with header) into competitors, keeping row order as seeding.
pub fn read_competitors_csv<R: Read>(reader: R) -> Result<Vec<Competitor>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect()
}
