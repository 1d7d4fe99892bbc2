//! Aggregation engine and result views.
//!
//! [`AnalysisBundle::compute`] derives every view from a
//! [`crate::types::CanonicalDataset`] in one pass over the public aggregate
//! functions, which are also usable individually:
//!
//! - [`dimension_totals`]: `total`/`count` per player, chest, source, or date
//! - [`player_average`]: mean score per player
//! - [`player_overview`]: player totals pivoted by source, zero-filled
//! - [`player_chest_frequency`]: count per occurring (player, chest) pair
//!
//! All of it is pure and total: identical input produces identical output,
//! and an empty dataset produces empty views rather than errors.

pub mod aggregate;
pub mod bundle;
pub mod view;

pub use aggregate::{
    date_totals, dimension_totals, player_average, player_chest_frequency, player_overview,
};
pub use bundle::AnalysisBundle;
pub use view::{AggregationView, DEFAULT_MEASURE};
