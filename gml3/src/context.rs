//! Configuration of the geometry conversion.

use gml3_types::PrecisionModel;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default maximum distance between an arc and the chords that approximate it.
pub const DEFAULT_ARC_APPROXIMATION_ERROR: f64 = 0.001;
/// Default spatial reference identifier (Amersfoort / RD New).
pub const DEFAULT_SRID: i32 = 28992;
/// Default minimum number of chords used for a full circle.
pub const DEFAULT_MIN_CIRCLE_SEGMENTS: usize = 8;
/// Default maximum number of chords a single arc can be approximated with.
pub const DEFAULT_MAX_ARC_SEGMENTS: usize = 65_536;

/// Settings applied to every geometry a parser converts.
///
/// A context is validated once when a [`GmlParser`](crate::GmlParser) is built and is never changed after that.
///
/// The context can be deserialized, missing fields take default values:
///
/// ```
/// use gml3::ConversionContext;
///
/// let context: ConversionContext = serde_json::from_str(r#"{
///     "srid": 4326,
///     "precision_model": { "type": "fixed", "scale": 1000.0 }
/// }"#)?;
///
/// assert_eq!(context.srid, 4326);
/// assert_eq!(context.max_arc_approximation_error, gml3::DEFAULT_ARC_APPROXIMATION_ERROR);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionContext {
    /// Maximum allowed distance between an approximating chord and the arc it replaces.
    pub max_arc_approximation_error: f64,
    /// Precision model every output coordinate is snapped to.
    pub precision_model: PrecisionModel,
    /// Spatial reference identifier the results are tagged with.
    pub srid: i32,
    /// Minimum number of chords for full circles, independent of the approximation error.
    pub min_circle_segments: usize,
    /// Maximum number of chords for a single arc. Arcs requiring more chords are rejected.
    pub max_arc_segments: usize,
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self {
            max_arc_approximation_error: DEFAULT_ARC_APPROXIMATION_ERROR,
            precision_model: PrecisionModel::default(),
            srid: DEFAULT_SRID,
            min_circle_segments: DEFAULT_MIN_CIRCLE_SEGMENTS,
            max_arc_segments: DEFAULT_MAX_ARC_SEGMENTS,
        }
    }
}

impl ConversionContext {
    /// Creates a context with the given error and SRID, and default values for other settings.
    pub fn new(max_arc_approximation_error: f64, srid: i32) -> Self {
        Self {
            max_arc_approximation_error,
            srid,
            ..Default::default()
        }
    }

    /// Checks that the settings can be used for conversion.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerance = self.max_arc_approximation_error;
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }

        self.precision_model.validate()?;

        if self.min_circle_segments < 3 {
            return Err(ConfigError::InvalidCircleSegments(self.min_circle_segments));
        }

        if self.max_arc_segments < self.min_circle_segments {
            return Err(ConfigError::InvalidMaxSegments {
                max: self.max_arc_segments,
                min: self.min_circle_segments,
            });
        }

        Ok(())
    }
}
