//! Transform Module
//!
//! Reshapes upstream documents into the simplified schema served to clients.

mod fred;
mod worldbank;

pub use fred::{reshape_observation, reshape_observations, FredObservation, FredSeries};
pub use worldbank::{reshape_indicator, IndicatorRow, IndicatorSeries};
