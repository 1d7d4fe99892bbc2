//! Grouped aggregation over a [`CanonicalDataset`].
//!
//! All functions here are pure: the same dataset always produces the same
//! view, and an empty dataset produces an empty view, never an error.
//!
//! Sort policy: the text-dimension totals views sort descending by `total`
//! with ties keeping first-encounter order (stable sort, not alphabetical);
//! the date view sorts ascending by date regardless of total.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::types::{CanonicalDataset, CanonicalRecord, Dimension, Value};

use super::view::AggregationView;

/// Per-dimension `total`/`count` view.
///
/// Columns: `[<DIMENSION>, total, count]`.
pub fn dimension_totals(dataset: &CanonicalDataset, dimension: Dimension) -> AggregationView {
    let key_column = dimension.column_name();
    match dimension {
        Dimension::Player => text_totals(dataset, "player_totals", key_column, |r| &r.player),
        Dimension::Chest => text_totals(dataset, "chest_totals", key_column, |r| &r.chest),
        Dimension::Source => text_totals(dataset, "source_totals", key_column, |r| &r.source),
        Dimension::Date => date_totals(dataset),
    }
}

/// `total`/`count` per calendar date, ascending by date.
pub fn date_totals(dataset: &CanonicalDataset) -> AggregationView {
    let mut groups: BTreeMap<NaiveDate, (f64, i64)> = BTreeMap::new();
    for record in &dataset.records {
        let entry = groups.entry(record.date).or_insert((0.0, 0));
        entry.0 += record.score;
        entry.1 += 1;
    }
    let rows = groups
        .into_iter()
        .map(|(date, (total, count))| {
            vec![Value::Date(date), Value::Float(total), Value::Int(count)]
        })
        .collect();
    AggregationView::new("date_totals", totals_columns("DATE"), rows)
}

/// Mean score per player, rounded to two decimals, descending by mean.
pub fn player_average(dataset: &CanonicalDataset) -> AggregationView {
    let mut groups = accumulate(dataset, |r| &r.player);
    groups.sort_by(|a, b| {
        let lhs = round2(b.total / b.count as f64);
        let rhs = round2(a.total / a.count as f64);
        lhs.partial_cmp(&rhs).unwrap_or(Ordering::Equal)
    });
    let rows = groups
        .into_iter()
        .map(|g| {
            vec![
                Value::Text(g.key.to_owned()),
                Value::Float(round2(g.total / g.count as f64)),
            ]
        })
        .collect();
    AggregationView::new(
        "player_average",
        vec!["PLAYER".to_string(), "average".to_string()],
        rows,
    )
}

/// Per-player totals widened with one column per distinct source.
///
/// Columns: `[PLAYER, total, count, <sources ascending by name>]`. Every
/// (player, source) cell holds the score sum for that pair, zero-filled
/// where no records exist. Rows sort descending by `total`.
pub fn player_overview(dataset: &CanonicalDataset) -> AggregationView {
    let sources: Vec<String> = dataset
        .records
        .iter()
        .map(|r| r.source.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let source_slot: HashMap<&str, usize> = sources
        .iter()
        .enumerate()
        .map(|(idx, s)| (s.as_str(), idx))
        .collect();

    struct Overview<'a> {
        player: &'a str,
        total: f64,
        count: i64,
        by_source: Vec<f64>,
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Overview<'_>> = Vec::new();
    for record in &dataset.records {
        let slot = *index.entry(record.player.as_str()).or_insert_with(|| {
            groups.push(Overview {
                player: &record.player,
                total: 0.0,
                count: 0,
                by_source: vec![0.0; sources.len()],
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.total += record.score;
        group.count += 1;
        if let Some(&source_idx) = source_slot.get(record.source.as_str()) {
            group.by_source[source_idx] += record.score;
        }
    }

    groups.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));

    let mut columns = vec![
        "PLAYER".to_string(),
        "total".to_string(),
        "count".to_string(),
    ];
    columns.extend(sources.iter().cloned());

    let rows = groups
        .into_iter()
        .map(|g| {
            let mut row = vec![
                Value::Text(g.player.to_owned()),
                Value::Float(g.total),
                Value::Int(g.count),
            ];
            row.extend(g.by_source.into_iter().map(Value::Float));
            row
        })
        .collect();
    AggregationView::new("player_overview", columns, rows)
}

/// Record count per (player, chest) pair.
///
/// One row per combination that actually occurs, in first-encounter order;
/// no zero fill.
pub fn player_chest_frequency(dataset: &CanonicalDataset) -> AggregationView {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut groups: Vec<(&str, &str, i64)> = Vec::new();
    for record in &dataset.records {
        let key = (record.player.as_str(), record.chest.as_str());
        match index.get(&key) {
            Some(&slot) => groups[slot].2 += 1,
            None => {
                index.insert(key, groups.len());
                groups.push((key.0, key.1, 1));
            }
        }
    }
    let rows = groups
        .into_iter()
        .map(|(player, chest, count)| {
            vec![
                Value::Text(player.to_owned()),
                Value::Text(chest.to_owned()),
                Value::Int(count),
            ]
        })
        .collect();
    AggregationView::new(
        "player_chest_frequency",
        vec![
            "PLAYER".to_string(),
            "CHEST".to_string(),
            "count".to_string(),
        ],
        rows,
    )
}

struct Group<'a> {
    key: &'a str,
    total: f64,
    count: i64,
}

// First-encounter-ordered accumulation of (total, count) per key.
fn accumulate<'a, F>(dataset: &'a CanonicalDataset, key_of: F) -> Vec<Group<'a>>
where
    F: Fn(&'a CanonicalRecord) -> &'a str,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();
    for record in &dataset.records {
        let key = key_of(record);
        match index.get(key) {
            Some(&slot) => {
                groups[slot].total += record.score;
                groups[slot].count += 1;
            }
            None => {
                index.insert(key, groups.len());
                groups.push(Group {
                    key,
                    total: record.score,
                    count: 1,
                });
            }
        }
    }
    groups
}

fn text_totals<'a, F>(
    dataset: &'a CanonicalDataset,
    view_name: &str,
    key_column: &str,
    key_of: F,
) -> AggregationView
where
    F: Fn(&'a CanonicalRecord) -> &'a str,
{
    let mut groups = accumulate(dataset, key_of);
    groups.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    let rows = groups
        .into_iter()
        .map(|g| {
            vec![
                Value::Text(g.key.to_owned()),
                Value::Float(g.total),
                Value::Int(g.count),
            ]
        })
        .collect();
    AggregationView::new(view_name, totals_columns(key_column), rows)
}

fn totals_columns(key_column: &str) -> Vec<String> {
    vec![
        key_column.to_string(),
        "total".to_string(),
        "count".to_string(),
    ]
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: NaiveDate, player: &str, source: &str, chest: &str, score: f64) -> CanonicalRecord {
        CanonicalRecord {
            date,
            player: player.to_string(),
            source: source.to_string(),
            chest: chest.to_string(),
            score,
            extras: Vec::new(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let dataset = CanonicalDataset::new(
            Vec::new(),
            vec![
                record(day(1), "Zoe", "Guild", "Gold", 100.0),
                record(day(1), "Amy", "Guild", "Gold", 100.0),
                record(day(1), "Mia", "Guild", "Gold", 100.0),
            ],
        );
        let view = dimension_totals(&dataset, Dimension::Player);
        let players: Vec<_> = view.rows.iter().map(|r| r[0].clone()).collect();
        assert_eq!(
            players,
            vec![
                Value::Text("Zoe".to_string()),
                Value::Text("Amy".to_string()),
                Value::Text("Mia".to_string()),
            ]
        );
    }

    #[test]
    fn date_view_sorts_ascending_regardless_of_total() {
        let dataset = CanonicalDataset::new(
            Vec::new(),
            vec![
                record(day(5), "Alice", "Guild", "Gold", 500.0),
                record(day(1), "Alice", "Guild", "Gold", 1.0),
                record(day(3), "Alice", "Guild", "Gold", 50.0),
            ],
        );
        let view = dimension_totals(&dataset, Dimension::Date);
        let dates: Vec<_> = view.rows.iter().map(|r| r[0].clone()).collect();
        assert_eq!(
            dates,
            vec![
                Value::Date(day(1)),
                Value::Date(day(3)),
                Value::Date(day(5)),
            ]
        );
    }

    #[test]
    fn player_average_rounds_to_two_decimals() {
        let dataset = CanonicalDataset::new(
            Vec::new(),
            vec![
                record(day(1), "Alice", "Guild", "Gold", 100.0),
                record(day(2), "Alice", "Guild", "Gold", 101.0),
                record(day(3), "Alice", "Guild", "Gold", 101.0),
            ],
        );
        let view = player_average(&dataset);
        assert_eq!(view.rows[0][1], Value::Float(100.67));
    }

    #[test]
    fn chest_frequency_counts_occurring_pairs_only() {
        let dataset = CanonicalDataset::new(
            Vec::new(),
            vec![
                record(day(1), "Alice", "Guild", "Gold", 1.0),
                record(day(2), "Alice", "Event", "Gold", 1.0),
                record(day(3), "Bob", "Battle", "Silver", 1.0),
            ],
        );
        let view = player_chest_frequency(&dataset);
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.rows[0][0], Value::Text("Alice".to_string()));
        assert_eq!(view.rows[0][2], Value::Int(2));
        assert_eq!(view.rows[1][0], Value::Text("Bob".to_string()));
    }

    #[test]
    fn empty_dataset_yields_empty_views() {
        let empty = CanonicalDataset::empty();
        assert_eq!(dimension_totals(&empty, Dimension::Player).row_count(), 0);
        assert_eq!(dimension_totals(&empty, Dimension::Date).row_count(), 0);
        assert_eq!(player_average(&empty).row_count(), 0);
        assert_eq!(player_overview(&empty).row_count(), 0);
        assert_eq!(player_chest_frequency(&empty).row_count(), 0);
        // Overview still has its fixed columns even with no sources.
        assert_eq!(player_overview(&empty).columns.len(), 3);
    }
}
