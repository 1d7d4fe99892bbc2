use chest_analytics::analysis::AnalysisBundle;
use chest_analytics::ingestion::{IngestOptions, ingest_bytes};
use chest_analytics::session::AnalysisSession;
use chest_analytics::types::{RecordFilter, Value};
use chrono::NaiveDate;

const SCENARIO: &[u8] = b"DATE,PLAYER,SOURCE,CHEST,SCORE\n\
2024-01-01,Alice,Guild,Gold,100\n\
2024-01-02,Bob,Battle,Silver,200\n\
2024-01-01,Alice,Event,Gold,50\n";

fn scenario_bundle() -> AnalysisBundle {
    let outcome = ingest_bytes(SCENARIO, &IngestOptions::default()).unwrap();
    AnalysisBundle::compute(outcome.dataset)
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn player_view_sorts_descending_by_total() {
    let bundle = scenario_bundle();
    let view = bundle.view("player_totals").unwrap();
    assert_eq!(view.columns, vec!["PLAYER", "total", "count"]);
    assert_eq!(
        view.rows,
        vec![
            vec![text("Bob"), Value::Float(200.0), Value::Int(1)],
            vec![text("Alice"), Value::Float(150.0), Value::Int(2)],
        ]
    );
}

#[test]
fn chest_view_sorts_descending_by_total() {
    let bundle = scenario_bundle();
    let view = bundle.view("chest_totals").unwrap();
    assert_eq!(
        view.rows,
        vec![
            vec![text("Silver"), Value::Float(200.0), Value::Int(1)],
            vec![text("Gold"), Value::Float(150.0), Value::Int(2)],
        ]
    );
}

#[test]
fn player_overview_pivots_sources_with_zero_fill() {
    let bundle = scenario_bundle();
    let view = bundle.view("player_overview").unwrap();
    assert_eq!(
        view.columns,
        vec!["PLAYER", "total", "count", "Battle", "Event", "Guild"]
    );
    assert_eq!(
        view.rows,
        vec![
            vec![
                text("Bob"),
                Value::Float(200.0),
                Value::Int(1),
                Value::Float(200.0),
                Value::Float(0.0),
                Value::Float(0.0),
            ],
            vec![
                text("Alice"),
                Value::Float(150.0),
                Value::Int(2),
                Value::Float(0.0),
                Value::Float(50.0),
                Value::Float(100.0),
            ],
        ]
    );
}

#[test]
fn sum_of_player_totals_equals_sum_of_scores() {
    let outcome = ingest_bytes(SCENARIO, &IngestOptions::default()).unwrap();
    let expected: f64 = outcome.dataset.total_score();
    let bundle = AnalysisBundle::compute(outcome.dataset);

    let view = bundle.view("player_totals").unwrap();
    let total_idx = view.column_index("total").unwrap();
    let summed: f64 = view
        .rows
        .iter()
        .filter_map(|row| row[total_idx].as_f64())
        .sum();
    assert_eq!(summed, expected);
}

#[test]
fn date_view_is_ascending_by_date() {
    let bundle = scenario_bundle();
    let view = bundle.view("date_totals").unwrap();
    assert_eq!(
        view.rows,
        vec![
            vec![
                Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
                Value::Float(150.0),
                Value::Int(2),
            ],
            vec![
                Value::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
                Value::Float(200.0),
                Value::Int(1),
            ],
        ]
    );
}

#[test]
fn player_average_is_rounded_and_descending() {
    let bundle = scenario_bundle();
    let view = bundle.view("player_average").unwrap();
    assert_eq!(view.columns, vec!["PLAYER", "average"]);
    assert_eq!(
        view.rows,
        vec![
            vec![text("Bob"), Value::Float(200.0)],
            vec![text("Alice"), Value::Float(75.0)],
        ]
    );
}

#[test]
fn player_chest_frequency_lists_occurring_pairs() {
    let bundle = scenario_bundle();
    let view = bundle.view("player_chest_frequency").unwrap();
    assert_eq!(view.columns, vec!["PLAYER", "CHEST", "count"]);
    assert_eq!(
        view.rows,
        vec![
            vec![text("Alice"), text("Gold"), Value::Int(2)],
            vec![text("Bob"), text("Silver"), Value::Int(1)],
        ]
    );
}

#[test]
fn filtering_twice_produces_identical_bundles() {
    let outcome = ingest_bytes(SCENARIO, &IngestOptions::default()).unwrap();
    let filter = RecordFilter {
        players: Some(["Alice".to_string()].into_iter().collect()),
        ..Default::default()
    };

    let once = AnalysisBundle::compute(filter.apply(&outcome.dataset));
    let twice = AnalysisBundle::compute(filter.apply(&filter.apply(&outcome.dataset)));
    assert_eq!(once, twice);
}

#[test]
fn session_filter_lifecycle_is_idempotent() {
    let mut session = AnalysisSession::load_bytes(SCENARIO, &IngestOptions::default()).unwrap();
    let unfiltered = session.bundle().clone();

    let filter = RecordFilter {
        sources: Some(["Guild".to_string()].into_iter().collect()),
        ..Default::default()
    };
    session.apply_filter(filter.clone());
    let filtered = session.bundle().clone();
    assert_eq!(filtered.dataset().record_count(), 1);

    session.apply_filter(filter);
    assert_eq!(session.bundle(), &filtered);

    session.clear_filter();
    assert_eq!(session.bundle(), &unfiltered);
}

#[test]
fn raw_view_can_be_resorted_by_any_column() {
    let bundle = scenario_bundle();
    let raw = bundle.view("raw").unwrap();

    let by_score = raw.sorted_by("SCORE", false).unwrap();
    assert_eq!(by_score.rows[0][4], Value::Float(200.0));

    let by_player = raw.sorted_by("PLAYER", true).unwrap();
    assert_eq!(by_player.rows[0][1], text("Alice"));

    assert!(raw.sorted_by("MISSING", true).is_none());
}

#[test]
fn chart_measure_falls_back_to_documented_default() {
    let bundle = scenario_bundle();
    let totals = bundle.view("player_totals").unwrap();
    // Requested measure missing from this view: substitute `total`.
    assert_eq!(
        totals.measure_column("average"),
        totals.column_index("total")
    );

    let averages = bundle.view("player_average").unwrap();
    // No `total` here either: the first numeric column is used.
    assert_eq!(
        averages.measure_column("total"),
        averages.column_index("average")
    );
}
