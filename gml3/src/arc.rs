//! Approximation of circular arcs by chords.
//!
//! An arc of radius `r` is replaced by `n` chords of equal angular length `θ / n`. The largest distance between
//! a chord and the arc it replaces (the sagitta) is `r * (1 - cos(θ / (2 * n)))`, and [`ArcApproximator`] picks
//! the smallest `n` that keeps the sagitta within the configured tolerance. Coarse tolerances are bounded by the
//! minimum number of chords for a full circle: an arc gets at least its proportional share of them.

use std::f64::consts::TAU;

use gml3_types::{Coordinate, Orientation};

use crate::context::ConversionContext;
use crate::error::{GeometryError, GeometryErrorKind};

/// Relative tolerance below which three points are considered to lie on a straight line.
const COLLINEAR_TOLERANCE: f64 = 1e-12;

/// Largest distance between a chord spanning `angle` radians and an arc of the given `radius`.
pub fn sagitta(radius: f64, angle: f64) -> f64 {
    radius * (1.0 - (angle / 2.0).cos())
}

/// Converts circular arcs into sequences of positions connected by straight chords.
///
/// ```
/// use gml3::arc::ArcApproximator;
/// use gml3_types::Coordinate;
///
/// let approximator = ArcApproximator::new(0.01, 8, 1000);
/// let half = 0.5f64.sqrt();
/// let points = approximator
///     .approximate_arc(
///         Coordinate::new(1.0, 0.0),
///         Coordinate::new(half, half),
///         Coordinate::new(0.0, 1.0),
///     )
///     .unwrap();
///
/// assert_eq!(points.first(), Some(&Coordinate::new(1.0, 0.0)));
/// assert_eq!(points.last(), Some(&Coordinate::new(0.0, 1.0)));
/// assert!(points.len() > 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcApproximator {
    tolerance: f64,
    min_circle_segments: usize,
    max_segments: usize,
}

impl ArcApproximator {
    /// Creates a new approximator.
    ///
    /// * `tolerance` - maximum distance between a chord and the arc
    /// * `min_circle_segments` - minimum number of chords for a full circle (at least 3 chords are always used)
    /// * `max_segments` - maximum number of chords for one arc
    pub fn new(tolerance: f64, min_circle_segments: usize, max_segments: usize) -> Self {
        Self {
            tolerance,
            min_circle_segments: min_circle_segments.max(3),
            max_segments,
        }
    }

    /// Creates an approximator with the settings of the context.
    pub fn from_context(context: &ConversionContext) -> Self {
        Self::new(
            context.max_arc_approximation_error,
            context.min_circle_segments,
            context.max_arc_segments,
        )
    }

    /// Maximum distance between a chord and the arc.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Smallest number of chords that approximates an arc with the given radius and sweep angle.
    ///
    /// Returns an error if the number exceeds the configured maximum, or if the tolerance is too small to be
    /// distinguished from the radius.
    pub fn segment_count(&self, radius: f64, sweep: f64) -> Result<usize, GeometryError> {
        let sweep = sweep.abs();
        if self.tolerance >= 2.0 * radius {
            return Ok(1);
        }

        let max_half_angle = (1.0 - self.tolerance / radius).acos();
        if max_half_angle.is_nan() || max_half_angle <= 0.0 {
            return Err(GeometryError::new(
                GeometryErrorKind::ArcApproximation,
                format!(
                    "tolerance {} is too small for an arc of radius {radius}",
                    self.tolerance
                ),
            ));
        }

        let estimate = (sweep / (2.0 * max_half_angle)).ceil().max(1.0);
        if estimate.is_nan() || estimate > self.max_segments as f64 {
            return Err(self.too_many_segments(radius, sweep));
        }

        let mut count = estimate as usize;
        while sagitta(radius, sweep / count as f64) > self.tolerance {
            count += 1;
            if count > self.max_segments {
                return Err(self.too_many_segments(radius, sweep));
            }
        }
        while count > 1 && sagitta(radius, sweep / (count - 1) as f64) <= self.tolerance {
            count -= 1;
        }

        Ok(count)
    }

    /// Number of chords actually used for an arc: the smallest count within the tolerance, but never less
    /// than the arc's share of `min_circle_segments`.
    fn arc_segment_count(&self, radius: f64, sweep: f64) -> Result<usize, GeometryError> {
        let share = sweep.abs().min(TAU) / TAU;
        let minimum = (self.min_circle_segments as f64 * share - 1e-9).ceil().max(1.0) as usize;
        Ok(self.segment_count(radius, sweep)?.max(minimum))
    }

    fn circle_segment_count(&self, radius: f64) -> Result<usize, GeometryError> {
        self.arc_segment_count(radius, TAU)
    }

    fn too_many_segments(&self, radius: f64, sweep: f64) -> GeometryError {
        GeometryError::new(
            GeometryErrorKind::ArcApproximation,
            format!(
                "arc of radius {radius} and sweep {sweep} requires more than {} segments for tolerance {}",
                self.max_segments, self.tolerance
            ),
        )
    }

    /// Approximates the arc that starts at `start`, passes through `mid` and ends at `end`.
    ///
    /// Collinear points give a straight segment from `start` to `end`. If `start` and `end` are the same point,
    /// the arc is a full circle with the diameter from `start` to `mid`.
    pub fn approximate_arc(
        &self,
        start: Coordinate,
        mid: Coordinate,
        end: Coordinate,
    ) -> Result<Vec<Coordinate>, GeometryError> {
        if start.equals_2d(&mid) && start.equals_2d(&end) {
            return Err(GeometryError::new(
                GeometryErrorKind::DegenerateArc,
                format!("all arc points are at ({}, {})", start.x, start.y),
            ));
        }

        if start.equals_2d(&end) {
            let center = Coordinate::new((start.x + mid.x) / 2.0, (start.y + mid.y) / 2.0);
            let radius = start.distance_2d(&mid) / 2.0;
            let start_angle = (start.y - center.y).atan2(start.x - center.x);
            let count = self.circle_segment_count(radius)?;

            return Ok(self.emit(center, radius, start_angle, TAU, count, start, end));
        }

        let orientation = Orientation::triplet(&start, &mid, &end, COLLINEAR_TOLERANCE);
        if orientation == Orientation::Collinear {
            return Ok(vec![start, end]);
        }

        let center = circumcenter(&start, &mid, &end)?;
        let radius = center.distance_2d(&start);
        let start_angle = (start.y - center.y).atan2(start.x - center.x);
        let end_angle = (end.y - center.y).atan2(end.x - center.x);

        let sweep = match orientation {
            Orientation::Counterclockwise => positive_angle(end_angle - start_angle),
            _ => -positive_angle(start_angle - end_angle),
        };

        let count = self.arc_segment_count(radius, sweep)?;
        Ok(self.emit(center, radius, start_angle, sweep, count, start, end))
    }

    /// Approximates an arc given by its circle and angles (in radians).
    ///
    /// A sweep of `2π` or more gives a full circle that ends where it starts.
    pub fn approximate_arc_by_center(
        &self,
        center: Coordinate,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    ) -> Result<Vec<Coordinate>, GeometryError> {
        if !center.is_finite() {
            return Err(GeometryError::new(
                GeometryErrorKind::NonFiniteCoordinate,
                format!("arc center ({}, {}) is not finite", center.x, center.y),
            ));
        }

        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::new(
                GeometryErrorKind::DegenerateArc,
                format!("arc radius must be a positive number, but is {radius}"),
            ));
        }

        if !(start_angle.is_finite() && sweep.is_finite()) || sweep == 0.0 {
            return Err(GeometryError::new(
                GeometryErrorKind::DegenerateArc,
                format!("invalid arc angles: start {start_angle}, sweep {sweep}"),
            ));
        }

        let point_at = |angle: f64| {
            Coordinate::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        };
        let start = point_at(start_angle);

        if sweep.abs() >= TAU {
            let count = self.circle_segment_count(radius)?;
            return Ok(self.emit(
                center,
                radius,
                start_angle,
                TAU.copysign(sweep),
                count,
                start,
                start,
            ));
        }

        let end = point_at(start_angle + sweep);
        let count = self.arc_segment_count(radius, sweep)?;
        Ok(self.emit(center, radius, start_angle, sweep, count, start, end))
    }

    /// Approximates a full circle passing through the three points, starting and ending at `a`.
    pub fn approximate_circle(
        &self,
        a: Coordinate,
        b: Coordinate,
        c: Coordinate,
    ) -> Result<Vec<Coordinate>, GeometryError> {
        let orientation = Orientation::triplet(&a, &b, &c, COLLINEAR_TOLERANCE);
        if orientation == Orientation::Collinear {
            return Err(GeometryError::new(
                GeometryErrorKind::DegenerateArc,
                format!(
                    "circle points ({}, {}), ({}, {}), ({}, {}) are collinear",
                    a.x, a.y, b.x, b.y, c.x, c.y
                ),
            ));
        }

        let center = circumcenter(&a, &b, &c)?;
        let radius = center.distance_2d(&a);
        let start_angle = (a.y - center.y).atan2(a.x - center.x);
        let count = self.circle_segment_count(radius)?;

        Ok(self.emit(
            center,
            radius,
            start_angle,
            TAU * orientation.signum(),
            count,
            a,
            a,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn emit(
        &self,
        center: Coordinate,
        radius: f64,
        start_angle: f64,
        sweep: f64,
        count: usize,
        start: Coordinate,
        end: Coordinate,
    ) -> Vec<Coordinate> {
        log::debug!(
            "Approximating arc with radius {radius} and sweep {sweep} by {count} segments"
        );

        let step = sweep / count as f64;
        let mut points = Vec::with_capacity(count + 1);
        points.push(start);
        for i in 1..count {
            let angle = start_angle + step * i as f64;
            points.push(Coordinate::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
        points.push(end);

        points
    }
}

/// Angle in the range `(0, 2π]`.
fn positive_angle(angle: f64) -> f64 {
    let angle = angle.rem_euclid(TAU);
    if angle == 0.0 {
        TAU
    } else {
        angle
    }
}

/// Center of the circle passing through three points. Computed relative to `p1` to keep precision for
/// coordinates far from the origin.
fn circumcenter(
    p1: &Coordinate,
    p2: &Coordinate,
    p3: &Coordinate,
) -> Result<Coordinate, GeometryError> {
    let (bx, by) = (p2.x - p1.x, p2.y - p1.y);
    let (cx, cy) = (p3.x - p1.x, p3.y - p1.y);
    let d = 2.0 * (bx * cy - by * cx);
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;

    let center = Coordinate::new(
        p1.x + (cy * b2 - by * c2) / d,
        p1.y + (bx * c2 - cx * b2) / d,
    );

    if center.is_finite() {
        Ok(center)
    } else {
        Err(GeometryError::new(
            GeometryErrorKind::DegenerateArc,
            "circle center cannot be determined",
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;

    fn approximator(tolerance: f64) -> ArcApproximator {
        ArcApproximator::from_context(&ConversionContext::new(tolerance, 28992))
    }

    fn max_deviation(points: &[Coordinate], center: Coordinate, radius: f64) -> f64 {
        points
            .windows(2)
            .map(|w| {
                let mid = Coordinate::new((w[0].x + w[1].x) / 2.0, (w[0].y + w[1].y) / 2.0);
                radius - mid.distance_2d(&center)
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn quarter_circle() {
        let start = Coordinate::new(1.0, 0.0);
        let end = Coordinate::new(0.0, 1.0);
        let half = 0.5f64.sqrt();
        let points = approximator(0.01)
            .approximate_arc(start, Coordinate::new(half, half), end)
            .unwrap();

        assert!(points.len() >= 3);
        assert_eq!(points[0], start);
        assert_eq!(points[points.len() - 1], end);
        assert!(max_deviation(&points, Coordinate::new(0.0, 0.0), 1.0) <= 0.01 + 1e-12);

        for point in &points {
            assert_abs_diff_eq!(
                point.distance_2d(&Coordinate::new(0.0, 0.0)),
                1.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn direction_is_preserved() {
        let start = Coordinate::new(1.0, 0.0);
        let end = Coordinate::new(0.0, 1.0);

        // Long way round, clockwise through (0, -1).
        let points = approximator(0.01)
            .approximate_arc(start, Coordinate::new(0.0, -1.0), end)
            .unwrap();

        let lowest = points
            .iter()
            .map(|p| p.y)
            .fold(f64::INFINITY, f64::min);
        assert_abs_diff_eq!(lowest, -1.0, epsilon = 0.02);
        assert!(points[1].y < 0.0);
        assert_eq!(points[points.len() - 1], end);
    }

    #[test]
    fn collinear_points_give_straight_segment() {
        let points = approximator(0.001)
            .approximate_arc(
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 1.0),
                Coordinate::new(2.0, 2.0),
            )
            .unwrap();
        assert_eq!(
            points,
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(2.0, 2.0)]
        );
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let p = Coordinate::new(3.0, 4.0);
        assert_matches!(
            approximator(0.001).approximate_arc(p, p, p),
            Err(GeometryError {
                kind: GeometryErrorKind::DegenerateArc,
                ..
            })
        );
    }

    #[test]
    fn closed_arc_is_full_circle() {
        let start = Coordinate::new(0.0, 0.0);
        let points = approximator(1e-6)
            .approximate_arc(start, Coordinate::new(2.0, 0.0), start)
            .unwrap();

        assert_eq!(points[0], start);
        assert_eq!(points[points.len() - 1], start);
        assert!(points.len() - 1 >= 8);
        assert!(max_deviation(&points, Coordinate::new(1.0, 0.0), 1.0) <= 1e-6 + 1e-12);
    }

    #[test]
    fn full_circle_minimum_segments() {
        let points = approximator(100.0)
            .approximate_circle(
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 1.0),
                Coordinate::new(2.0, 0.0),
            )
            .unwrap();

        assert_eq!(points.len(), 9);
        assert_eq!(points[0], points[8]);

        let points = ArcApproximator::new(100.0, 0, 100)
            .approximate_arc_by_center(Coordinate::new(0.0, 0.0), 1.0, 0.0, TAU)
            .unwrap();
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn circle_direction_follows_points() {
        // Clockwise through the top.
        let points = approximator(0.01)
            .approximate_circle(
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 1.0),
                Coordinate::new(2.0, 0.0),
            )
            .unwrap();
        assert!(points[1].y > 0.0);
    }

    #[test]
    fn collinear_circle_is_degenerate() {
        assert_matches!(
            approximator(0.01).approximate_circle(
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 0.0),
                Coordinate::new(2.0, 0.0),
            ),
            Err(GeometryError {
                kind: GeometryErrorKind::DegenerateArc,
                ..
            })
        );
    }

    #[test]
    fn arc_by_center() {
        let points = approximator(0.001)
            .approximate_arc_by_center(
                Coordinate::new(10.0, 10.0),
                5.0,
                FRAC_PI_2,
                -FRAC_PI_2,
            )
            .unwrap();

        assert_abs_diff_eq!(points[0], Coordinate::new(10.0, 15.0), epsilon = 1e-12);
        assert_abs_diff_eq!(
            points[points.len() - 1],
            Coordinate::new(15.0, 10.0),
            epsilon = 1e-12
        );
        assert!(max_deviation(&points, Coordinate::new(10.0, 10.0), 5.0) <= 0.001 + 1e-12);
    }

    #[test]
    fn invalid_arc_by_center() {
        let approximator = approximator(0.001);
        let center = Coordinate::new(0.0, 0.0);
        for (radius, sweep) in [
            (0.0, 1.0),
            (-1.0, 1.0),
            (f64::NAN, 1.0),
            (1.0, 0.0),
            (1.0, f64::INFINITY),
        ] {
            assert_matches!(
                approximator.approximate_arc_by_center(center, radius, 0.0, sweep),
                Err(GeometryError {
                    kind: GeometryErrorKind::DegenerateArc,
                    ..
                })
            );
        }
    }

    #[test]
    fn too_many_segments() {
        let approximator = ArcApproximator::new(1e-6, 8, 100);
        assert_matches!(
            approximator.segment_count(1000.0, TAU),
            Err(GeometryError {
                kind: GeometryErrorKind::ArcApproximation,
                ..
            })
        );

        assert_matches!(
            approximator.segment_count(1e12, 1.0),
            Err(GeometryError {
                kind: GeometryErrorKind::ArcApproximation,
                ..
            })
        );
    }

    #[test]
    fn large_tolerance_gives_single_segment() {
        assert_eq!(approximator(10.0).segment_count(1.0, 3.0), Ok(1));
    }

    #[test]
    fn arcs_get_their_share_of_circle_segments() {
        let approximator = approximator(10.0);

        let half = approximator
            .approximate_arc(
                Coordinate::new(10.0, 0.0),
                Coordinate::new(0.0, 10.0),
                Coordinate::new(-10.0, 0.0),
            )
            .unwrap();
        assert_eq!(half.len(), 5);
        assert_eq!(half[4], Coordinate::new(-10.0, 0.0));

        let quarter = approximator
            .approximate_arc_by_center(Coordinate::new(0.0, 0.0), 1.0, 0.0, -FRAC_PI_2)
            .unwrap();
        assert_eq!(quarter.len(), 3);

        let sliver = approximator
            .approximate_arc_by_center(Coordinate::new(0.0, 0.0), 1.0, 0.0, 0.1)
            .unwrap();
        assert_eq!(sliver.len(), 2);
    }

    proptest! {
        #[test]
        fn segment_count_is_minimal(
            radius in 0.1f64..1000.0,
            sweep in 0.001f64..TAU,
            tolerance in 0.0001f64..1.0,
        ) {
            let count = approximator(tolerance).segment_count(radius, sweep).unwrap();

            prop_assert!(count >= 1);
            prop_assert!(sagitta(radius, sweep / count as f64) <= tolerance);
            if count > 1 {
                prop_assert!(sagitta(radius, sweep / (count - 1) as f64) > tolerance);
            }
        }

        #[test]
        fn chords_stay_close_to_arc(
            radius in 0.1f64..1000.0,
            start_angle in -TAU..TAU,
            sweep in -TAU..TAU,
            tolerance in 0.001f64..1.0,
        ) {
            prop_assume!(sweep.abs() > 1e-3);
            let center = Coordinate::new(155_000.0, 463_000.0);
            let points = approximator(tolerance)
                .approximate_arc_by_center(center, radius, start_angle, sweep)
                .unwrap();

            prop_assert!(points.len() >= 2);
            prop_assert!(max_deviation(&points, center, radius) <= tolerance + 1e-6);
        }
    }
}
