use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::error::Gml3TypesError;

/// A position given in a GML document.
///
/// Coordinates are planar (`x`, `y`) with an optional elevation. They carry no precision of their own: values are
/// kept exactly as read from the document and are snapped only when converted into a planar geometry.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Coordinate {
    /// First axis value.
    pub x: f64,
    /// Second axis value.
    pub y: f64,
    /// Elevation, if the document declares a third dimension.
    pub z: Option<f64>,
}

impl Coordinate {
    /// Creates a planar coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Creates a coordinate with elevation.
    pub const fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Returns true if all the values of the coordinate are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_none_or(f64::is_finite)
    }

    /// Compares only the planar part of two coordinates.
    pub fn equals_2d(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Euclidean distance between planar parts of the coordinates.
    pub fn distance_2d(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl TryFrom<&[f64]> for Coordinate {
    type Error = Gml3TypesError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        match *values {
            [x, y] => Ok(Self::new(x, y)),
            [x, y, z] => Ok(Self::with_z(x, y, z)),
            _ => Err(Gml3TypesError::Coordinate(format!(
                "coordinate must have 2 or 3 dimensions, but has {}",
                values.len()
            ))),
        }
    }
}

impl AbsDiffEq for Coordinate {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        let z_eq = match (self.z, other.z) {
            (Some(a), Some(b)) => a.abs_diff_eq(&b, epsilon),
            (None, None) => true,
            _ => false,
        };

        z_eq && self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn from_values() {
        assert_eq!(
            Coordinate::try_from(&[1.0, 2.0][..]),
            Ok(Coordinate::new(1.0, 2.0))
        );
        assert_eq!(
            Coordinate::try_from(&[1.0, 2.0, 3.0][..]),
            Ok(Coordinate::with_z(1.0, 2.0, 3.0))
        );
        assert!(Coordinate::try_from(&[1.0][..]).is_err());
        assert!(Coordinate::try_from(&[1.0, 2.0, 3.0, 4.0][..]).is_err());
    }

    #[test]
    fn finite() {
        assert!(Coordinate::new(1.0, 2.0).is_finite());
        assert!(!Coordinate::new(f64::NAN, 2.0).is_finite());
        assert!(!Coordinate::with_z(1.0, 2.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn planar_equality_ignores_elevation() {
        let a = Coordinate::with_z(1.0, 2.0, 3.0);
        let b = Coordinate::new(1.0, 2.0);
        assert!(a.equals_2d(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn abs_diff_eq() {
        assert_abs_diff_eq!(
            Coordinate::new(1.0, 2.0),
            Coordinate::new(1.0 + 1e-12, 2.0 - 1e-12),
            epsilon = 1e-9
        );
        assert!(!Coordinate::new(1.0, 2.0).abs_diff_eq(&Coordinate::with_z(1.0, 2.0, 0.0), 1e-9));
    }
}
