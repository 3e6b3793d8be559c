//! Integration tests for competitor CSV import and result sinks.

mod common;

use common::tournament_with;
use ski_tournament::storage::{
    read_competitors_csv, read_result_rows, CsvResultSink, MemoryResultSink, ResultSink,
    TestMetadata, TestSubmission,
};
use ski_tournament::{final_ranking, record_duel_result, submit_round, Competitor};
use std::fs::File;

fn finished_submission() -> TestSubmission {
    let mut t = tournament_with(&["A", "B", "C"]);
    record_duel_result(&mut t, 0, "A", Some(1.0)).unwrap();
    submit_round(&mut t).unwrap();
    record_duel_result(&mut t, 0, "C", Some(4.0)).unwrap();
    submit_round(&mut t).unwrap();
    TestSubmission {
        tournament_id: t.id,
        rankings: final_ranking(&t).unwrap(),
        metadata: TestMetadata::new("Sjusjøen", "-8C, fine-grained old snow"),
    }
}

#[test]
fn reads_competitors_in_order() {
    let data = "id,serial_number\nski-2, 4471\nski-1,4470\n";
    let competitors = read_competitors_csv(data.as_bytes()).unwrap();
    assert_eq!(
        competitors,
        vec![Competitor::new("ski-2", "4471"), Competitor::new("ski-1", "4470")]
    );
}

#[test]
fn rejects_rows_without_serial() {
    let data = "id\nski-1\n";
    assert!(read_competitors_csv(data.as_bytes()).is_err());
}

#[test]
fn csv_sink_appends_with_single_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let sink = CsvResultSink::new(&path);
    let submission = finished_submission();

    sink.submit(&submission).unwrap();
    sink.submit(&submission).unwrap();

    let rows = read_result_rows(File::open(&path).unwrap()).unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].competitor_id, "C");
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[2].cumulative_score, 5.0);
    assert_eq!(rows[3].competitor_id, "C");
    assert!(rows.iter().all(|r| r.tournament_id == submission.tournament_id));
    assert_eq!(rows[0].location, "Sjusjøen");
    assert_eq!(rows[0].timestamp, submission.metadata.timestamp);
}

#[test]
fn memory_sink_keeps_submissions() {
    let sink = MemoryResultSink::new();
    let submission = finished_submission();
    sink.submit(&submission).unwrap();
    assert_eq!(sink.submissions().unwrap(), vec![submission]);
}

#[test]
fn metadata_timestamp_defaults_to_now() {
    let meta: TestMetadata = serde_json::from_str(r#"{"location":"Lillehammer"}"#).unwrap();
    assert_eq!(meta.location, "Lillehammer");
    assert!(meta.conditions.is_empty());
    assert!(meta.comment.is_none());
}
