//! Orientation of point triplets.
use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// Orientation of a triplet of points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Clockwise
    Clockwise,
    /// Counterclockwise
    Counterclockwise,
    /// Collinear
    Collinear,
}

impl Orientation {
    /// Determines orientation of a triplet of points.
    ///
    /// The triplet is considered collinear if the doubled area of the triangle they form is not greater than
    /// `tolerance` multiplied by the squared length of the longest side of the triangle. This makes the result
    /// independent of the scale of the coordinates. Non-finite coordinates are reported as collinear.
    pub fn triplet(p: &Coordinate, q: &Coordinate, r: &Coordinate, tolerance: f64) -> Self {
        let cross = (q.x - p.x) * (r.y - q.y) - (q.y - p.y) * (r.x - q.x);
        let scale = [(p, q), (q, r), (r, p)]
            .iter()
            .map(|(a, b)| (a.x - b.x).powi(2) + (a.y - b.y).powi(2))
            .fold(0.0, f64::max);

        if !cross.is_finite() || cross.abs() <= tolerance * scale {
            Self::Collinear
        } else if cross > 0.0 {
            Self::Counterclockwise
        } else {
            Self::Clockwise
        }
    }

    /// Sign of the rotation: `1.0` for counterclockwise, `-1.0` for clockwise and `0.0` for collinear points.
    pub fn signum(&self) -> f64 {
        match self {
            Orientation::Counterclockwise => 1.0,
            Orientation::Clockwise => -1.0,
            Orientation::Collinear => 0.0,
        }
    }
}
