//! Flattening of curves into sequences of planar coordinates.

use geo_types::Coord;
use gml3_types::{Coordinate, Curve, CurveSegment, Ring};

use super::Converter;
use crate::error::{GeometryError, GeometryErrorKind};

impl Converter<'_> {
    /// Snaps the coordinate to the precision model, dropping the elevation.
    pub(super) fn coordinate(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Coord<f64>, GeometryError> {
        let snapped = self.context.precision_model.snap(&finite(coordinate)?);
        let snapped = finite(&snapped)?;
        Ok(snapped.into())
    }

    /// Converts a sequence of positions into snapped planar coordinates.
    pub(super) fn points(&self, points: &[Coordinate]) -> Result<Vec<Coord<f64>>, GeometryError> {
        points.iter().map(|p| self.coordinate(p)).collect()
    }

    /// Flattens all segments of the curve into one sequence of coordinates.
    ///
    /// The first position of every segment must be equal to the last position of the previous one after
    /// snapping. Only end points of arcs given by center and angles are computed, so a gap within the arc
    /// approximation tolerance is allowed next to them, and the exactly given position is kept at the joint.
    pub(super) fn flatten(&self, curve: &Curve) -> Result<Vec<Coord<f64>>, GeometryError> {
        Ok(self.flatten_segments(curve)?.points)
    }

    fn flatten_segments(&self, curve: &Curve) -> Result<Flattened, GeometryError> {
        let mut flattened = Flattened::default();
        for (index, segment) in curve.segments.iter().enumerate() {
            let computed = matches!(segment, CurveSegment::ArcByCenter { .. });
            let positions = match segment {
                CurveSegment::LineString(positions) => positions.clone(),
                CurveSegment::Arc { start, mid, end } => self.approximator.approximate_arc(
                    finite(start)?,
                    finite(mid)?,
                    finite(end)?,
                )?,
                CurveSegment::ArcByCenter {
                    center,
                    radius,
                    start_angle,
                    sweep_angle,
                } => self.approximator.approximate_arc_by_center(
                    *center,
                    *radius,
                    *start_angle,
                    *sweep_angle,
                )?,
                CurveSegment::Circle { a, b, c } => {
                    self.approximator
                        .approximate_circle(finite(a)?, finite(b)?, finite(c)?)?
                }
            };

            if index == 0 {
                flattened.starts_computed = computed;
            }
            self.append(&mut flattened, &positions, computed)?;
            flattened.ends_computed = computed;
        }

        Ok(flattened)
    }

    fn append(
        &self,
        flattened: &mut Flattened,
        segment: &[Coordinate],
        computed: bool,
    ) -> Result<(), GeometryError> {
        let mut segment = segment.iter();
        if let Some(last) = flattened.points.last().copied() {
            let Some(first) = segment.next() else {
                return Ok(());
            };

            let first = self.coordinate(first)?;
            if first != last {
                let tolerant = computed || flattened.ends_computed;
                if !tolerant || distance(first, last) > self.approximator.tolerance() {
                    return Err(GeometryError::new(
                        GeometryErrorKind::DisconnectedSegments,
                        format!(
                            "segment starts at ({}, {}), but previous segment ends at ({}, {})",
                            first.x, first.y, last.x, last.y
                        ),
                    ));
                }

                if flattened.ends_computed && !computed {
                    let last_index = flattened.points.len() - 1;
                    flattened.points[last_index] = first;
                }
            }
        }

        for position in segment {
            flattened.points.push(self.coordinate(position)?);
        }

        Ok(())
    }

    /// Flattens the ring and makes sure it is closed.
    ///
    /// The first and last positions must be equal after snapping. If one of them is computed from an arc given
    /// by center and angles, they are allowed to differ within the arc approximation tolerance, and the computed
    /// position is replaced by the other one.
    pub(super) fn ring(&self, ring: &Ring) -> Result<Vec<Coord<f64>>, GeometryError> {
        let Flattened {
            mut points,
            starts_computed,
            ends_computed,
        } = self.flatten_segments(&ring.curve)?;

        let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
            return Err(GeometryError::new(
                GeometryErrorKind::TooFewPoints,
                "ring has no positions",
            ));
        };

        if first != last {
            let tolerant = starts_computed || ends_computed;
            if !tolerant || distance(first, last) > self.approximator.tolerance() {
                return Err(GeometryError::new(
                    GeometryErrorKind::NotClosed,
                    format!(
                        "first point ({}, {}) differs from last point ({}, {})",
                        first.x, first.y, last.x, last.y
                    ),
                ));
            }

            let last_index = points.len() - 1;
            if ends_computed {
                points[last_index] = first;
            } else {
                points[0] = last;
            }
        }

        if points.len() < 4 {
            return Err(GeometryError::new(
                GeometryErrorKind::TooFewPoints,
                format!(
                    "ring must have at least 4 positions, but has {}",
                    points.len()
                ),
            ));
        }

        Ok(points)
    }
}

/// Coordinates of a flattened curve, and whether its end points are computed rather than given.
#[derive(Debug, Default)]
struct Flattened {
    points: Vec<Coord<f64>>,
    starts_computed: bool,
    ends_computed: bool,
}

fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

fn finite(coordinate: &Coordinate) -> Result<Coordinate, GeometryError> {
    if coordinate.is_finite() {
        Ok(*coordinate)
    } else {
        Err(GeometryError::new(
            GeometryErrorKind::NonFiniteCoordinate,
            format!("({}, {})", coordinate.x, coordinate.y),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use assert_matches::assert_matches;
    use geo_types::coord;
    use gml3_types::PrecisionModel;

    use super::*;
    use crate::ConversionContext;

    fn with_converter<T>(context: ConversionContext, f: impl FnOnce(&Converter) -> T) -> T {
        f(&Converter::new(&context))
    }

    #[test]
    fn joins_are_not_duplicated() {
        let curve = Curve::new(vec![
            CurveSegment::LineString(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)]),
            CurveSegment::LineString(vec![Coordinate::new(1.0, 0.0), Coordinate::new(1.0, 1.0)]),
        ]);

        let points = with_converter(ConversionContext::default(), |c| c.flatten(&curve)).unwrap();
        assert_eq!(
            points,
            vec![
                coord!(x: 0.0, y: 0.0),
                coord!(x: 1.0, y: 0.0),
                coord!(x: 1.0, y: 1.0)
            ]
        );
    }

    #[test]
    fn small_gap_at_straight_joint_is_disconnected() {
        let curve = Curve::new(vec![
            CurveSegment::LineString(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)]),
            CurveSegment::LineString(vec![
                Coordinate::new(1.0009, 0.0),
                Coordinate::new(2.0, 0.0),
            ]),
        ]);

        assert_matches!(
            with_converter(ConversionContext::default(), |c| c.flatten(&curve)),
            Err(GeometryError {
                kind: GeometryErrorKind::DisconnectedSegments,
                ..
            })
        );
    }

    #[test]
    fn computed_arc_end_joins_within_tolerance() {
        let curve = Curve::new(vec![
            CurveSegment::ArcByCenter {
                center: Coordinate::new(0.0, 0.0),
                radius: 1.0,
                start_angle: 0.0,
                sweep_angle: FRAC_PI_2,
            },
            CurveSegment::LineString(vec![Coordinate::new(0.0, 1.0), Coordinate::new(0.0, 2.0)]),
        ]);

        let points = with_converter(ConversionContext::default(), |c| c.flatten(&curve)).unwrap();
        assert_eq!(points[0], coord!(x: 1.0, y: 0.0));
        assert_eq!(points[points.len() - 2], coord!(x: 0.0, y: 1.0));
        assert_eq!(points[points.len() - 1], coord!(x: 0.0, y: 2.0));

        let far = Curve::new(vec![
            CurveSegment::ArcByCenter {
                center: Coordinate::new(0.0, 0.0),
                radius: 1.0,
                start_angle: 0.0,
                sweep_angle: FRAC_PI_2,
            },
            CurveSegment::LineString(vec![Coordinate::new(0.0, 1.1), Coordinate::new(0.0, 2.0)]),
        ]);
        assert_matches!(
            with_converter(ConversionContext::default(), |c| c.flatten(&far)),
            Err(GeometryError {
                kind: GeometryErrorKind::DisconnectedSegments,
                ..
            })
        );
    }

    #[test]
    fn disconnected_segments() {
        let curve = Curve::new(vec![
            CurveSegment::LineString(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)]),
            CurveSegment::LineString(vec![Coordinate::new(2.0, 0.0), Coordinate::new(3.0, 0.0)]),
        ]);

        assert_matches!(
            with_converter(ConversionContext::default(), |c| c.flatten(&curve)),
            Err(GeometryError {
                kind: GeometryErrorKind::DisconnectedSegments,
                ..
            })
        );
    }

    #[test]
    fn ring_closure() {
        let open = Ring::linear(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 1.0),
        ]);
        assert_matches!(
            with_converter(ConversionContext::default(), |c| c.ring(&open)),
            Err(GeometryError {
                kind: GeometryErrorKind::NotClosed,
                ..
            })
        );

        let almost_closed = Ring::linear(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(0.0, 0.0009),
        ]);
        assert_matches!(
            with_converter(ConversionContext::default(), |c| c.ring(&almost_closed)),
            Err(GeometryError {
                kind: GeometryErrorKind::NotClosed,
                ..
            })
        );

        let short = Ring::linear(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(0.0, 0.0),
        ]);
        assert_matches!(
            with_converter(ConversionContext::default(), |c| c.ring(&short)),
            Err(GeometryError {
                kind: GeometryErrorKind::TooFewPoints,
                ..
            })
        );
    }

    #[test]
    fn ring_starting_on_computed_arc() {
        // Arc from (0, 1) to (-1, 0), its end points are off by a rounding error.
        let ring = Ring::new(Curve::new(vec![
            CurveSegment::ArcByCenter {
                center: Coordinate::new(0.0, 0.0),
                radius: 1.0,
                start_angle: FRAC_PI_2,
                sweep_angle: FRAC_PI_2,
            },
            CurveSegment::LineString(vec![
                Coordinate::new(-1.0, 0.0),
                Coordinate::new(0.0, 0.0),
                Coordinate::new(0.0, 1.0),
            ]),
        ]));

        let points = with_converter(ConversionContext::default(), |c| c.ring(&ring)).unwrap();
        assert_eq!(points[0], coord!(x: 0.0, y: 1.0));
        assert_eq!(points[points.len() - 1], coord!(x: 0.0, y: 1.0));
        assert!(points.contains(&coord!(x: -1.0, y: 0.0)));
    }

    #[test]
    fn coordinates_are_snapped_and_checked() {
        let context = ConversionContext {
            precision_model: PrecisionModel::Fixed { scale: 1000.0 },
            ..Default::default()
        };

        let points = with_converter(context.clone(), |c| {
            c.points(&[Coordinate::with_z(155_000.12345, 463_000.9876, 12.0)])
        })
        .unwrap();
        assert_eq!(points, vec![coord!(x: 155_000.123, y: 463_000.988)]);

        assert_matches!(
            with_converter(context, |c| c.points(&[Coordinate::new(f64::NAN, 0.0)])),
            Err(GeometryError {
                kind: GeometryErrorKind::NonFiniteCoordinate,
                ..
            })
        );
    }

    #[test]
    fn single_precision_overflow_is_not_finite() {
        let context = ConversionContext {
            precision_model: PrecisionModel::FloatingSingle,
            ..Default::default()
        };
        assert_matches!(
            with_converter(context, |c| c.points(&[Coordinate::new(1e300, 0.0)])),
            Err(GeometryError {
                kind: GeometryErrorKind::NonFiniteCoordinate,
                ..
            })
        );
    }
}
