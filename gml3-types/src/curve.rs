//! Curves are sequences of segments.
//!
//! A segment is either a straight line string or a circular arc. Arcs can be given by three points lying on the
//! arc, or by the center of the circle, its radius and the angles of the arc end points. Consecutive segments of
//! a [`Curve`] are contiguous: the last position of a segment is the first position of the next one.
//!
//! # Ring vs Curve
//!
//! A [`Ring`] is a curve that is known to be closed, meaning that its first and last positions are equal. Unlike
//! closed contours of some geometry libraries, the last position is repeated explicitly, as it is in the document.
//! The tree does not enforce closure by itself, it is checked when the ring is converted.

use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// A single piece of a [`Curve`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum CurveSegment {
    /// Straight segments connecting the given positions.
    LineString(Vec<Coordinate>),
    /// Circular arc from `start` through `mid` to `end`.
    Arc {
        /// First position of the arc.
        start: Coordinate,
        /// Any position on the arc between `start` and `end`.
        mid: Coordinate,
        /// Last position of the arc.
        end: Coordinate,
    },
    /// Circular arc given by its circle and angles.
    ArcByCenter {
        /// Center of the circle.
        center: Coordinate,
        /// Radius of the circle.
        radius: f64,
        /// Angle of the first position of the arc, in radians from the first axis.
        start_angle: f64,
        /// Signed angular length of the arc in radians. Positive values go counter-clockwise.
        sweep_angle: f64,
    },
    /// Full circle through three positions, starting and ending at `a`.
    Circle {
        /// First (and last) position of the circle.
        a: Coordinate,
        /// Second position along the direction of travel.
        b: Coordinate,
        /// Third position along the direction of travel.
        c: Coordinate,
    },
}

impl CurveSegment {
    /// First position of the segment, if it can be determined without approximation.
    pub fn start(&self) -> Option<Coordinate> {
        match self {
            CurveSegment::LineString(points) => points.first().copied(),
            CurveSegment::Arc { start, .. } => Some(*start),
            CurveSegment::Circle { a, .. } => Some(*a),
            CurveSegment::ArcByCenter { .. } => None,
        }
    }

    /// Last position of the segment, if it can be determined without approximation.
    pub fn end(&self) -> Option<Coordinate> {
        match self {
            CurveSegment::LineString(points) => points.last().copied(),
            CurveSegment::Arc { end, .. } => Some(*end),
            CurveSegment::Circle { a, .. } => Some(*a),
            CurveSegment::ArcByCenter { .. } => None,
        }
    }

    /// Whether the segment is curved.
    pub fn is_arc(&self) -> bool {
        !matches!(self, CurveSegment::LineString(_))
    }
}

/// Ordered sequence of contiguous segments.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Curve {
    /// Segments in the direction of travel.
    pub segments: Vec<CurveSegment>,
}

impl Curve {
    /// Creates a new curve.
    pub fn new(segments: Vec<CurveSegment>) -> Self {
        Self { segments }
    }

    /// Creates a curve of a single straight segment.
    pub fn straight(points: Vec<Coordinate>) -> Self {
        Self {
            segments: vec![CurveSegment::LineString(points)],
        }
    }

    /// Appends all the segments of the `other` curve to this one.
    pub fn append(&mut self, other: Curve) {
        self.segments.extend(other.segments);
    }

    /// Whether any of the segments is curved.
    pub fn has_arcs(&self) -> bool {
        self.segments.iter().any(CurveSegment::is_arc)
    }
}

impl From<Vec<CurveSegment>> for Curve {
    fn from(segments: Vec<CurveSegment>) -> Self {
        Self { segments }
    }
}

/// A curve that closes on itself. See module documentation for details.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Ring {
    /// Boundary of the ring.
    pub curve: Curve,
}

impl Ring {
    /// Creates a new ring.
    pub fn new(curve: Curve) -> Self {
        Self { curve }
    }

    /// Creates a ring of straight segments.
    pub fn linear(points: Vec<Coordinate>) -> Self {
        Self {
            curve: Curve::straight(points),
        }
    }
}

impl From<Curve> for Ring {
    fn from(curve: Curve) -> Self {
        Self { curve }
    }
}
