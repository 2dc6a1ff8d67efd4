//! Precision models for snapping coordinates.
use serde::{Deserialize, Serialize};

use crate::error::Gml3TypesError;
use crate::Coordinate;

/// Rule for rounding coordinate values.
///
/// Snapping is idempotent: snapping an already snapped value returns the same value.
#[derive(Debug, Copy, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrecisionModel {
    /// Full double precision, values are not changed.
    #[default]
    Floating,
    /// Values are rounded to the nearest single precision float.
    FloatingSingle,
    /// Values are rounded to a grid with cell size of `1 / scale`.
    Fixed {
        /// Number of grid cells per coordinate unit. `1000.0` keeps three decimal digits.
        scale: f64,
    },
}

impl PrecisionModel {
    /// Creates a fixed precision model, checking that the scale is a positive finite number.
    pub fn fixed(scale: f64) -> Result<Self, Gml3TypesError> {
        let model = Self::Fixed { scale };
        model.validate()?;
        Ok(model)
    }

    /// Checks the parameters of the model.
    pub fn validate(&self) -> Result<(), Gml3TypesError> {
        match self {
            PrecisionModel::Fixed { scale } if !(scale.is_finite() && *scale > 0.0) => {
                Err(Gml3TypesError::Precision(format!(
                    "scale must be a positive finite number, but is {scale}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Snaps a single value.
    pub fn make_precise(&self, value: f64) -> f64 {
        match self {
            PrecisionModel::Floating => value,
            PrecisionModel::FloatingSingle => value as f32 as f64,
            PrecisionModel::Fixed { scale } => {
                let snapped = (value * scale).round() / scale;
                // Overflowing values are kept as is.
                if snapped.is_finite() {
                    snapped
                } else {
                    value
                }
            }
        }
    }

    /// Snaps all values of the coordinate.
    pub fn snap(&self, coordinate: &Coordinate) -> Coordinate {
        Coordinate {
            x: self.make_precise(coordinate.x),
            y: self.make_precise(coordinate.y),
            z: coordinate.z.map(|z| self.make_precise(z)),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn floating_keeps_values() {
        let c = Coordinate::with_z(0.1 + 0.2, 1.0 / 3.0, 7.0);
        assert_eq!(PrecisionModel::Floating.snap(&c), c);
    }

    #[test]
    fn fixed_rounds_to_grid() {
        let model = PrecisionModel::fixed(1000.0).unwrap();
        assert_eq!(model.make_precise(155000.12345), 155000.123);
        assert_eq!(model.make_precise(-2.71828), -2.718);
        assert_eq!(model.make_precise(2.0), 2.0);

        let model = PrecisionModel::fixed(0.5).unwrap();
        assert_eq!(model.make_precise(1234.3), 1234.0);
    }

    #[test]
    fn floating_single_rounds_to_f32() {
        let value = 0.1f64;
        assert_eq!(
            PrecisionModel::FloatingSingle.make_precise(value),
            0.1f32 as f64
        );
    }

    #[test]
    fn invalid_scale() {
        assert!(PrecisionModel::fixed(0.0).is_err());
        assert!(PrecisionModel::fixed(-10.0).is_err());
        assert!(PrecisionModel::fixed(f64::NAN).is_err());
        assert!(PrecisionModel::Floating.validate().is_ok());
    }

    #[test]
    fn deserialize() {
        let model: PrecisionModel =
            serde_json::from_str(r#"{"type": "fixed", "scale": 100.0}"#).unwrap();
        assert_eq!(model, PrecisionModel::Fixed { scale: 100.0 });

        let model: PrecisionModel = serde_json::from_str(r#"{"type": "floating_single"}"#).unwrap();
        assert_eq!(model, PrecisionModel::FloatingSingle);
    }

    fn model_strategy() -> impl Strategy<Value = PrecisionModel> {
        prop_oneof![
            Just(PrecisionModel::Floating),
            Just(PrecisionModel::FloatingSingle),
            prop::sample::select(vec![0.01, 1.0, 100.0, 1000.0, 1e6])
                .prop_map(|scale| PrecisionModel::Fixed { scale }),
        ]
    }

    proptest! {
        #[test]
        fn snapping_is_idempotent(
            model in model_strategy(),
            x in -1e6f64..1e6,
            y in -1e6f64..1e6,
        ) {
            let once = model.snap(&Coordinate::new(x, y));
            let twice = model.snap(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
