use thiserror::Error;

use crate::match_log::Venue;

/// Caller-visible failures. `NoData` is deliberately a recoverable,
/// pattern-matchable variant: the engine catches it and falls back to
/// league-average assumptions instead of failing the whole prediction.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("unsupported data format: {0}")]
    DataFormat(String),

    #[error("no {venue} match data found for team: {team}")]
    NoData { team: String, venue: Venue },

    #[error("prediction failed: {0}")]
    Prediction(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
