//! Integration tests for cumulative scores and final rankings over whole tournaments.

mod common;

use common::tournament_with;
use ski_tournament::{
    cumulative_score, final_ranking, record_duel_result, submit_round, Tournament,
    TournamentError,
};

fn scores(t: &Tournament) -> Vec<(String, f64)> {
    final_ranking(t)
        .unwrap()
        .into_iter()
        .map(|r| (r.competitor_id, r.cumulative_score))
        .collect()
}

#[test]
fn four_skis_without_byes() {
    let mut t = tournament_with(&["A", "B", "C", "D"]);
    record_duel_result(&mut t, 0, "A", Some(5.0)).unwrap();
    record_duel_result(&mut t, 1, "C", Some(3.0)).unwrap();
    submit_round(&mut t).unwrap();
    record_duel_result(&mut t, 0, "A", Some(2.0)).unwrap();
    submit_round(&mut t).unwrap();

    assert_eq!(
        scores(&t),
        vec![
            ("A".to_string(), 0.0),
            ("C".to_string(), 2.0),
            ("B".to_string(), 5.0),
            ("D".to_string(), 5.0),
        ]
    );
    let ranks: Vec<_> = final_ranking(&t).unwrap().iter().map(|r| r.rank).collect();
    assert_eq!(ranks, [1, 2, 3, 3]);
}

#[test]
fn three_skis_with_bye() {
    let mut t = tournament_with(&["A", "B", "C"]);
    record_duel_result(&mut t, 0, "A", Some(1.0)).unwrap();
    submit_round(&mut t).unwrap();
    let duel = &t.round[0];
    assert_eq!(duel.skis.len(), 2);
    record_duel_result(&mut t, 0, "C", Some(4.0)).unwrap();
    submit_round(&mut t).unwrap();

    assert_eq!(
        scores(&t),
        vec![
            ("C".to_string(), 0.0),
            ("A".to_string(), 4.0),
            ("B".to_string(), 5.0),
        ]
    );
}

#[test]
fn ranking_requires_completion() {
    let t = tournament_with(&["A", "B"]);
    assert_eq!(final_ranking(&t), Err(TournamentError::InvalidState));
}

#[test]
fn scores_grow_along_the_loss_chain() {
    // 11 skis, always the first seed wins, margins vary per duel.
    let labels: Vec<String> = (0..11).map(|i| format!("S{i:02}")).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let mut t = tournament_with(&refs);
    let mut margin = 0.5;
    while t.state == ski_tournament::TournamentState::InProgress {
        let decisions: Vec<_> = t
            .round
            .iter()
            .filter(|d| !d.is_bye())
            .map(|d| (d.id, d.skis[0].id.clone()))
            .collect();
        for (id, winner) in decisions {
            record_duel_result(&mut t, id, &winner, Some(margin)).unwrap();
            margin += 0.5;
        }
        submit_round(&mut t).unwrap();
    }

    let champion = t.champion().unwrap().id.clone();
    assert_eq!(cumulative_score(&champion, &t.loss_path), 0.0);
    assert_eq!(t.loss_path.len(), 10);
    for (loser, entry) in &t.loss_path {
        let own = cumulative_score(loser, &t.loss_path);
        let winner = cumulative_score(&entry.lost_to, &t.loss_path);
        assert!(own >= entry.score_diff);
        assert!(own >= winner);
    }
}
