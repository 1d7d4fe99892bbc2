//! The immutable bundle of all computed views for one dataset.

use crate::types::{CanonicalDataset, Dimension, REQUIRED_FIELDS, Value};

use super::aggregate;
use super::view::AggregationView;

/// An immutable snapshot of every aggregate view for one
/// [`CanonicalDataset`], plus the dataset itself rendered as the `raw` view.
///
/// Construction never fails: every aggregate is a total function over a
/// well-formed (possibly empty) dataset. A bundle is a disposable cache —
/// recompute it when the dataset changes; never mutate one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisBundle {
    dataset: CanonicalDataset,
    raw: AggregationView,
    player_totals: AggregationView,
    chest_totals: AggregationView,
    source_totals: AggregationView,
    date_totals: AggregationView,
    player_average: AggregationView,
    player_overview: AggregationView,
    player_chest_frequency: AggregationView,
}

impl AnalysisBundle {
    /// Every view name, in presentation order.
    pub const VIEW_NAMES: [&'static str; 8] = [
        "raw",
        "player_totals",
        "chest_totals",
        "source_totals",
        "date_totals",
        "player_average",
        "player_overview",
        "player_chest_frequency",
    ];

    /// Compute all views for `dataset`.
    pub fn compute(dataset: CanonicalDataset) -> Self {
        let raw = raw_view(&dataset);
        let player_totals = aggregate::dimension_totals(&dataset, Dimension::Player);
        let chest_totals = aggregate::dimension_totals(&dataset, Dimension::Chest);
        let source_totals = aggregate::dimension_totals(&dataset, Dimension::Source);
        let date_totals = aggregate::dimension_totals(&dataset, Dimension::Date);
        let player_average = aggregate::player_average(&dataset);
        let player_overview = aggregate::player_overview(&dataset);
        let player_chest_frequency = aggregate::player_chest_frequency(&dataset);
        Self {
            dataset,
            raw,
            player_totals,
            chest_totals,
            source_totals,
            date_totals,
            player_average,
            player_overview,
            player_chest_frequency,
        }
    }

    /// The dataset this bundle was computed from.
    pub fn dataset(&self) -> &CanonicalDataset {
        &self.dataset
    }

    /// Look up a view by name (see [`Self::VIEW_NAMES`]).
    pub fn view(&self, name: &str) -> Option<&AggregationView> {
        match name {
            "raw" => Some(&self.raw),
            "player_totals" => Some(&self.player_totals),
            "chest_totals" => Some(&self.chest_totals),
            "source_totals" => Some(&self.source_totals),
            "date_totals" => Some(&self.date_totals),
            "player_average" => Some(&self.player_average),
            "player_overview" => Some(&self.player_overview),
            "player_chest_frequency" => Some(&self.player_chest_frequency),
            _ => None,
        }
    }

    /// Iterate all views in [`Self::VIEW_NAMES`] order.
    pub fn views(&self) -> impl Iterator<Item = &AggregationView> {
        Self::VIEW_NAMES
            .iter()
            .filter_map(|name| self.view(name))
    }
}

// The canonical dataset as a table: canonical columns first, extras after.
fn raw_view(dataset: &CanonicalDataset) -> AggregationView {
    let mut columns: Vec<String> = REQUIRED_FIELDS.iter().map(|c| c.to_string()).collect();
    columns.extend(dataset.extra_columns.iter().cloned());

    let rows = dataset
        .records
        .iter()
        .map(|r| {
            let mut row = vec![
                Value::Date(r.date),
                Value::Text(r.player.clone()),
                Value::Text(r.source.clone()),
                Value::Text(r.chest.clone()),
                Value::Float(r.score),
            ];
            row.extend(r.extras.iter().map(|e| Value::Text(e.clone())));
            row
        })
        .collect();
    AggregationView::new("raw", columns, rows)
}
