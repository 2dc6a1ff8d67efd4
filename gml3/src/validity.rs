//! Validity checks of planar geometries.
//!
//! A geometry is valid when:
//! * all coordinates are finite,
//! * line strings have at least two distinct points,
//! * rings are closed, have at least four points and do not touch or cross themselves,
//! * holes of a polygon lie inside its exterior ring and do not touch it, each other, or lie inside each other,
//! * polygons of a multipolygon touch each other at single points at most and do not lie inside each other.
//!
//! Intersections are found with [`geo::line_intersection`] and point containment with
//! [`CoordinatePosition`].

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::line_intersection::{line_intersection, LineIntersection};
use geo_types::{Coord, Geometry, Line, LineString, Polygon};

use crate::error::{InvalidGeometryError, ValidityErrorKind};

/// Checks validity of the geometry, returning the first problem found.
pub fn check(geometry: &Geometry<f64>) -> Result<(), InvalidGeometryError> {
    match geometry {
        Geometry::Point(point) => check_finite(std::iter::once(&point.0)),
        Geometry::MultiPoint(points) => check_finite(points.iter().map(|p| &p.0)),
        Geometry::LineString(line) => check_line(line),
        Geometry::MultiLineString(lines) => lines.iter().try_for_each(check_line),
        Geometry::Polygon(polygon) => check_polygon(polygon),
        Geometry::MultiPolygon(polygons) => {
            polygons.iter().try_for_each(check_polygon)?;
            check_shells(&polygons.0)
        }
        Geometry::GeometryCollection(collection) => collection.iter().try_for_each(check),
        Geometry::Line(line) => check_finite([&line.start, &line.end].into_iter()),
        Geometry::Rect(rect) => check_finite([&rect.min(), &rect.max()].into_iter()),
        Geometry::Triangle(triangle) => check_finite(triangle.to_array().iter()),
    }
}

fn error(kind: ValidityErrorKind, location: Option<Coord<f64>>) -> InvalidGeometryError {
    InvalidGeometryError::new(kind, location)
}

fn check_finite<'a>(
    mut coords: impl Iterator<Item = &'a Coord<f64>>,
) -> Result<(), InvalidGeometryError> {
    match coords.find(|c| !(c.x.is_finite() && c.y.is_finite())) {
        Some(c) => Err(error(ValidityErrorKind::NonFiniteCoordinate, Some(*c))),
        None => Ok(()),
    }
}

/// Points of the line with consecutive duplicates removed.
fn distinct_points(line: &LineString<f64>) -> Vec<Coord<f64>> {
    let mut points = line.0.clone();
    points.dedup();
    points
}

fn check_line(line: &LineString<f64>) -> Result<(), InvalidGeometryError> {
    check_finite(line.0.iter())?;
    if distinct_points(line).len() < 2 {
        return Err(error(
            ValidityErrorKind::TooFewPoints,
            line.0.first().copied(),
        ));
    }

    Ok(())
}

fn check_ring(ring: &LineString<f64>) -> Result<(), InvalidGeometryError> {
    check_finite(ring.0.iter())?;

    let (Some(first), Some(last)) = (ring.0.first(), ring.0.last()) else {
        return Err(error(ValidityErrorKind::TooFewPoints, None));
    };
    if first != last {
        return Err(error(ValidityErrorKind::RingNotClosed, Some(*first)));
    }

    let points = distinct_points(ring);
    if points.len() < 4 {
        return Err(error(ValidityErrorKind::TooFewPoints, Some(*first)));
    }

    match self_intersection(&segments(&points)) {
        Some(location) => Err(error(ValidityErrorKind::SelfIntersecting, Some(location))),
        None => Ok(()),
    }
}

fn segments(points: &[Coord<f64>]) -> Vec<Line<f64>> {
    points.windows(2).map(|w| Line::new(w[0], w[1])).collect()
}

fn bounds_overlap(a: &Line<f64>, b: &Line<f64>) -> bool {
    a.start.x.min(a.end.x) <= b.start.x.max(b.end.x)
        && b.start.x.min(b.end.x) <= a.start.x.max(a.end.x)
        && a.start.y.min(a.end.y) <= b.start.y.max(b.end.y)
        && b.start.y.min(b.end.y) <= a.start.y.max(a.end.y)
}

fn intersection_point(intersection: LineIntersection<f64>) -> Coord<f64> {
    match intersection {
        LineIntersection::SinglePoint { intersection, .. } => intersection,
        LineIntersection::Collinear { intersection } => intersection.start,
    }
}

/// Finds a point where a closed chain of segments touches or crosses itself.
///
/// Consecutive segments always share an end point, so for them only overlaps are reported.
fn self_intersection(segments: &[Line<f64>]) -> Option<Coord<f64>> {
    let count = segments.len();
    let mut order: Vec<usize> = (0..count).collect();
    order.sort_by(|&a, &b| min_x(&segments[a]).total_cmp(&min_x(&segments[b])));

    for (position, &i) in order.iter().enumerate() {
        let max_x = segments[i].start.x.max(segments[i].end.x);
        for &j in &order[position + 1..] {
            if min_x(&segments[j]) > max_x {
                break;
            }
            if !bounds_overlap(&segments[i], &segments[j]) {
                continue;
            }

            let Some(intersection) = line_intersection(segments[i], segments[j]) else {
                continue;
            };

            let adjacent = i.abs_diff(j) == 1 || i.abs_diff(j) == count - 1;
            match intersection {
                LineIntersection::SinglePoint { .. } if adjacent => {}
                other => return Some(intersection_point(other)),
            }
        }
    }

    None
}

fn min_x(line: &Line<f64>) -> f64 {
    line.start.x.min(line.end.x)
}

/// Finds any common point of two chains of segments.
fn intersection(a: &[Line<f64>], b: &[Line<f64>]) -> Option<Coord<f64>> {
    for sa in a {
        for sb in b {
            if !bounds_overlap(sa, sb) {
                continue;
            }
            if let Some(intersection) = line_intersection(*sa, *sb) {
                return Some(intersection_point(intersection));
            }
        }
    }

    None
}

fn check_polygon(polygon: &Polygon<f64>) -> Result<(), InvalidGeometryError> {
    check_ring(polygon.exterior())?;
    for interior in polygon.interiors() {
        check_ring(interior)?;
    }

    let shell = Polygon::new(polygon.exterior().clone(), vec![]);
    let shell_segments = segments(&polygon.exterior().0);
    let holes: Vec<(Polygon<f64>, Vec<Line<f64>>)> = polygon
        .interiors()
        .iter()
        .map(|ring| (Polygon::new(ring.clone(), vec![]), segments(&ring.0)))
        .collect();

    for (hole, hole_segments) in &holes {
        if let Some(location) = intersection(&shell_segments, hole_segments) {
            return Err(error(ValidityErrorKind::SelfIntersecting, Some(location)));
        }

        let vertex = hole.exterior().0[0];
        if shell.coordinate_position(&vertex) != CoordPos::Inside {
            return Err(error(ValidityErrorKind::HoleOutsideShell, Some(vertex)));
        }
    }

    for (i, (hole, hole_segments)) in holes.iter().enumerate() {
        for (other, other_segments) in &holes[i + 1..] {
            if let Some(location) = intersection(hole_segments, other_segments) {
                return Err(error(ValidityErrorKind::SelfIntersecting, Some(location)));
            }

            for (inner, outer) in [(hole, other), (other, hole)] {
                let vertex = inner.exterior().0[0];
                if outer.coordinate_position(&vertex) == CoordPos::Inside {
                    return Err(error(ValidityErrorKind::NestedHoles, Some(vertex)));
                }
            }
        }
    }

    Ok(())
}

/// Checks that polygons of a multipolygon only touch at single points. A polygon inside a hole of another
/// polygon is allowed.
fn check_shells(polygons: &[Polygon<f64>]) -> Result<(), InvalidGeometryError> {
    let shells: Vec<Vec<Line<f64>>> = polygons
        .iter()
        .map(|polygon| segments(&polygon.exterior().0))
        .collect();
    let boundaries: Vec<Vec<Line<f64>>> = polygons
        .iter()
        .map(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .flat_map(|ring| segments(&ring.0))
                .collect()
        })
        .collect();

    for i in 0..polygons.len() {
        for j in i + 1..polygons.len() {
            for (inner, outer) in [(i, j), (j, i)] {
                for segment in &shells[inner] {
                    check_shell_segment(segment, &boundaries[outer], &polygons[outer])?;
                }
            }
        }
    }

    Ok(())
}

/// Checks one segment of a shell against the boundary of another polygon.
///
/// Touching at a point is allowed. Shared pieces of boundary and proper crossings are `SelfIntersecting`.
/// Any part of the segment between the touching points that lies in the interior of the
/// other polygon makes the shells nested.
fn check_shell_segment(
    segment: &Line<f64>,
    boundary: &[Line<f64>],
    polygon: &Polygon<f64>,
) -> Result<(), InvalidGeometryError> {
    let mut cuts = vec![segment.start, segment.end];
    for other in boundary {
        if !bounds_overlap(segment, other) {
            continue;
        }

        match line_intersection(*segment, *other) {
            None => {}
            Some(LineIntersection::SinglePoint {
                intersection,
                is_proper: false,
            }) => cuts.push(intersection),
            Some(intersection) => {
                return Err(error(
                    ValidityErrorKind::SelfIntersecting,
                    Some(intersection_point(intersection)),
                ))
            }
        }
    }

    let delta = segment.delta();
    let along =
        |c: &Coord<f64>| (c.x - segment.start.x) * delta.x + (c.y - segment.start.y) * delta.y;
    cuts.sort_by(|a, b| along(a).total_cmp(&along(b)));
    cuts.dedup();

    let pieces = cuts.windows(2).map(|w| Coord {
        x: (w[0].x + w[1].x) / 2.0,
        y: (w[0].y + w[1].y) / 2.0,
    });
    for point in std::iter::once(segment.start).chain(pieces) {
        if polygon.coordinate_position(&point) == CoordPos::Inside {
            return Err(error(ValidityErrorKind::NestedShells, Some(point)));
        }
    }

    Ok(())
}
