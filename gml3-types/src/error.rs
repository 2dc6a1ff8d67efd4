//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Gml3TypesError {
    /// Coordinate values cannot form a coordinate.
    #[error("invalid coordinate: {0}")]
    Coordinate(String),
    /// Precision model parameters are out of range.
    #[error("invalid precision model: {0}")]
    Precision(String),
}
