//! Result sinks: where a finished ranking goes once the tournament is over.

use crate::logic::RankingEntry;
use crate::models::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Errors from writing results.
#[derive(Debug)]
pub enum SinkError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// A previous writer panicked while holding the sink.
    Poisoned,
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkError::Io(e) => write!(f, "Failed to write results: {}", e),
            SinkError::Csv(e) => write!(f, "Failed to encode results: {}", e),
            SinkError::Poisoned => write!(f, "Result sink is unusable after an earlier failure"),
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Io(e) => Some(e),
            SinkError::Csv(e) => Some(e),
            SinkError::Poisoned => None,
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(e: std::io::Error) -> Self {
        SinkError::Io(e)
    }
}

impl From<csv::Error> for SinkError {
    fn from(e: csv::Error) -> Self {
        SinkError::Csv(e)
    }
}

/// Free-form description of the test session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestMetadata {
    pub location: String,
    /// Snow and weather conditions, as entered by the tester.
    #[serde(default)]
    pub conditions: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl TestMetadata {
    pub fn new(location: impl Into<String>, conditions: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            conditions: conditions.into(),
            comment: None,
            timestamp: Utc::now(),
        }
    }
}

/// A finished ranking plus its metadata, handed off for durable storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestSubmission {
    pub tournament_id: TournamentId,
    pub rankings: Vec<RankingEntry>,
    pub metadata: TestMetadata,
}

/// Durable storage for results. Implementations do not retry; the caller decides.
pub trait ResultSink: Send + Sync {
    fn submit(&self, submission: &TestSubmission) -> Result<(), SinkError>;
}

/// One CSV row per ranked ski.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub tournament_id: TournamentId,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub conditions: String,
    pub rank: usize,
    pub competitor_id: String,
    pub serial_number: String,
    pub cumulative_score: f64,
}

impl ResultRow {
    fn rows(submission: &TestSubmission) -> impl Iterator<Item = ResultRow> + '_ {
        let meta = &submission.metadata;
        submission.rankings.iter().map(move |r| ResultRow {
            tournament_id: submission.tournament_id,
            timestamp: meta.timestamp,
            location: meta.location.clone(),
            conditions: meta.conditions.clone(),
            rank: r.rank,
            competitor_id: r.competitor_id.clone(),
            serial_number: r.serial_number.clone(),
            cumulative_score: r.cumulative_score,
        })
    }
}

/// Appends results to a CSV file, writing the header when the file is new.
pub struct CsvResultSink {
    path: PathBuf,
    /// Serializes appends from concurrent submissions.
    lock: Mutex<()>,
}

impl CsvResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for CsvResultSink {
    fn submit(&self, submission: &TestSubmission) -> Result<(), SinkError> {
        let _guard = self.lock.lock().map_err(|_| SinkError::Poisoned)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        for row in ResultRow::rows(submission) {
            writer.serialize(row)?;
        }
        writer.flush()?;
        log::info!(
            "Wrote {} result rows for tournament {} to {}",
            submission.rankings.len(),
            submission.tournament_id,
            self.path.display()
        );
        Ok(())
    }
}

/// Read rows written by [`CsvResultSink`].
pub fn read_result_rows<R: Read>(reader: R) -> Result<Vec<ResultRow>, csv::Error> {
    csv::Reader::from_reader(reader).deserialize().collect()
}

/// Keeps submissions in memory.
#[derive(Debug, Default)]
pub struct MemoryResultSink {
    submissions: Mutex<Vec<TestSubmission>>,
}

impl MemoryResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything submitted so far.
    pub fn submissions(&self) -> Result<Vec<TestSubmission>, SinkError> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .map_err(|_| SinkError::Poisoned)
    }
}

impl ResultSink for MemoryResultSink {
    fn submit(&self, submission: &TestSubmission) -> Result<(), SinkError> {
        self.submissions
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(submission.clone());
        Ok(())
    }
}
