use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use goalcast::config::EngineConfig;
use goalcast::engine::PredictionEngine;
use goalcast::error::PredictorError;
use goalcast::form::MatchOutcome;

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

/// Writes a throwaway match log so reload tests can mutate it freely.
fn temp_log(tag: &str, contents: &str) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "goalcast_{}_{}_{}.json",
        std::process::id(),
        tag,
        n
    ));
    fs::write(&path, contents).expect("temp match log should be writable");
    path
}

const SINGLE_MATCH: &str = r#"[
    {"homeTeam": "A", "awayTeam": "B", "homeScore": 2, "awayScore": 0, "date": "2023-01-01"}
]"#;

#[test]
fn single_match_form_from_both_perspectives() {
    let path = temp_log("single", SINGLE_MATCH);
    let engine = PredictionEngine::open(&path, EngineConfig::default()).unwrap();

    let a = engine.form("A", Some(5));
    assert_eq!((a.wins, a.draws, a.losses), (1, 0, 0));
    assert_eq!(a.goals_scored, 2);
    assert_eq!(a.goals_conceded, 0);
    assert_eq!(a.match_history.len(), 1);
    assert_eq!(a.match_history[0].outcome, MatchOutcome::Win);

    let b = engine.form("B", Some(5));
    assert_eq!((b.wins, b.draws, b.losses), (0, 0, 1));
    assert_eq!(b.goals_scored, 0);
    assert_eq!(b.goals_conceded, 2);
    assert_eq!(b.match_history[0].outcome, MatchOutcome::Loss);
}

#[test]
fn predict_is_bit_identical_between_reloads() {
    let engine =
        PredictionEngine::open(fixture_path("matches.json"), EngineConfig::default()).unwrap();

    let first = engine.predict("Barcelona", "Real Madrid").unwrap();
    let second = engine.predict("Barcelona", "Real Madrid").unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn prediction_outcome_triple_sums_to_one() {
    let engine =
        PredictionEngine::open(fixture_path("matches.json"), EngineConfig::default()).unwrap();
    let p = engine.predict("Barcelona", "Sevilla").unwrap();

    let sum = p.probabilities.home_win + p.probabilities.draw + p.probabilities.away_win;
    assert!((sum - 1.0).abs() < 1e-6);
    for market in [
        p.goal_markets.over_1_5,
        p.goal_markets.over_2_5,
        p.goal_markets.both_teams_score,
    ] {
        assert!((0.0..=1.0).contains(&market));
    }
    assert!(p.most_likely_score.home < 6 && p.most_likely_score.away < 6);
}

#[test]
fn prediction_carries_form_insights_and_venue_analysis() {
    let engine =
        PredictionEngine::open(fixture_path("matches.json"), EngineConfig::default()).unwrap();
    let p = engine.predict("Barcelona", "Real Madrid").unwrap();

    assert_eq!(p.home_form.team, "Barcelona");
    assert_eq!(p.away_form.team, "Real Madrid");
    assert!(p.home_form.has_data());

    let venue = p.venue_analysis.expect("both sides have venue history");
    assert_eq!(venue.home.matches_played, 2);
    assert_eq!(venue.away.matches_played, 2);
    assert!(venue.lambda_home > 0.0);
}

#[test]
fn unknown_teams_predict_with_average_strength() {
    // Deliberate: sparse or missing history biases to league average
    // instead of failing, to keep the caller's surface total.
    let engine =
        PredictionEngine::open(fixture_path("matches.json"), EngineConfig::default()).unwrap();
    let p = engine.predict("Atlantis FC", "El Dorado United").unwrap();

    let cfg = engine.config();
    assert!((p.lambda_home - cfg.home_goal_baseline).abs() < 1e-12);
    assert!((p.lambda_away - cfg.away_goal_baseline).abs() < 1e-12);
    assert!(!p.home_form.has_data());
    assert_eq!(p.home_form.period, "No data");
    assert!(p.venue_analysis.is_none());
}

#[test]
fn team_without_home_history_still_predicts() {
    // C has only ever played away: venue analysis is unavailable for a
    // fixture hosting them, but the prediction itself must succeed.
    let path = temp_log(
        "away_only",
        r#"[
            {"homeTeam": "A", "awayTeam": "C", "homeScore": 1, "awayScore": 2, "date": "2023-01-01"},
            {"homeTeam": "B", "awayTeam": "C", "homeScore": 0, "awayScore": 1, "date": "2023-01-08"},
            {"homeTeam": "A", "awayTeam": "B", "homeScore": 2, "awayScore": 2, "date": "2023-01-15"}
        ]"#,
    );
    let engine = PredictionEngine::open(&path, EngineConfig::default()).unwrap();

    let p = engine.predict("C", "A").unwrap();
    assert!(p.venue_analysis.is_none());
    assert!(p.home_form.has_data());
    assert!(p.lambda_home > 0.0);

    // The reverse fixture has venue data on both sides.
    let reverse = engine.predict("A", "C").unwrap();
    assert!(reverse.venue_analysis.is_some());
}

#[test]
fn blank_team_name_is_a_prediction_error() {
    let engine =
        PredictionEngine::open(fixture_path("matches.json"), EngineConfig::default()).unwrap();
    let err = engine.predict("  \n ", "Sevilla").unwrap_err();
    assert!(matches!(err, PredictorError::Prediction(_)));
}

#[test]
fn refresh_swaps_in_the_new_snapshot() {
    let path = temp_log("reload", SINGLE_MATCH);
    let engine = PredictionEngine::open(&path, EngineConfig::default()).unwrap();
    assert_eq!(engine.teams(), vec!["A", "B"]);

    fs::write(
        &path,
        r#"[
            {"homeTeam": "A", "awayTeam": "B", "homeScore": 2, "awayScore": 0, "date": "2023-01-01"},
            {"homeTeam": "B", "awayTeam": "C", "homeScore": 1, "awayScore": 1, "date": "2023-01-08"}
        ]"#,
    )
    .unwrap();

    let count = engine.refresh().unwrap();
    assert_eq!(count, 2);
    assert_eq!(engine.teams(), vec!["A", "B", "C"]);
    assert_eq!(engine.matches().len(), 2);

    // The new snapshot feeds predictions immediately.
    let form = engine.form("B", Some(5));
    assert_eq!(form.window_actual, 2);
    assert_eq!((form.wins, form.draws, form.losses), (0, 1, 1));
}

#[test]
fn failed_refresh_keeps_the_working_snapshot() {
    let path = temp_log("reload_bad", SINGLE_MATCH);
    let engine = PredictionEngine::open(&path, EngineConfig::default()).unwrap();

    fs::write(&path, "definitely not json").unwrap();
    let err = engine.refresh().unwrap_err();
    assert!(matches!(err, PredictorError::DataFormat(_)));

    // Old snapshot still serves queries.
    assert_eq!(engine.teams(), vec!["A", "B"]);
    let p = engine.predict("A", "B").unwrap();
    assert!(p.home_form.has_data());
}

#[test]
fn csv_and_json_sources_predict_identically() {
    let json_engine =
        PredictionEngine::open(fixture_path("matches.json"), EngineConfig::default()).unwrap();
    let csv_engine =
        PredictionEngine::open(fixture_path("matches.csv"), EngineConfig::default()).unwrap();

    let a = json_engine.predict("Real Madrid", "Valencia").unwrap();
    let b = csv_engine.predict("Real Madrid", "Valencia").unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
