use serde::{Deserialize, Serialize};

use crate::curve::{Curve, Ring};
use crate::geometry_type::{CollectionType, GeometryKind};
use crate::surface::Surface;
use crate::Coordinate;

/// A geometry element of a GML document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum GmlGeometry {
    /// Single position.
    Point(Coordinate),
    /// Straight segments connecting the positions.
    LineString(Vec<Coordinate>),
    /// Curve possibly containing arcs.
    Curve(Curve),
    /// Closed curve.
    Ring(Ring),
    /// Area with optional holes.
    Surface(Surface),
    /// Collection of geometries.
    MultiGeometry(MultiGeometry),
}

impl GmlGeometry {
    /// Kind of the node.
    pub fn kind(&self) -> GeometryKind {
        match self {
            GmlGeometry::Point(_) => GeometryKind::Point,
            GmlGeometry::LineString(_) => GeometryKind::LineString,
            GmlGeometry::Curve(_) => GeometryKind::Curve,
            GmlGeometry::Ring(_) => GeometryKind::Ring,
            GmlGeometry::Surface(_) => GeometryKind::Surface,
            GmlGeometry::MultiGeometry(v) => GeometryKind::Collection(v.collection_type),
        }
    }

    /// Whether the geometry or any of its parts contain curved segments.
    pub fn has_arcs(&self) -> bool {
        match self {
            GmlGeometry::Point(_) | GmlGeometry::LineString(_) => false,
            GmlGeometry::Curve(curve) => curve.has_arcs(),
            GmlGeometry::Ring(ring) => ring.curve.has_arcs(),
            GmlGeometry::Surface(surface) => surface.iter_rings().any(|r| r.curve.has_arcs()),
            GmlGeometry::MultiGeometry(multi) => multi.members.iter().any(GmlGeometry::has_arcs),
        }
    }
}

/// Ordered collection of geometries with a declared member type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MultiGeometry {
    /// Member type declared by the collection element.
    pub collection_type: CollectionType,
    /// Members in document order.
    pub members: Vec<GmlGeometry>,
}

impl MultiGeometry {
    /// Creates a new collection.
    pub fn new(collection_type: CollectionType, members: Vec<GmlGeometry>) -> Self {
        Self {
            collection_type,
            members,
        }
    }

    /// Returns the first member that the declared collection type does not allow.
    pub fn first_mismatch(&self) -> Option<&GmlGeometry> {
        self.members
            .iter()
            .find(|m| !self.collection_type.accepts(m.kind()))
    }
}

impl From<Coordinate> for GmlGeometry {
    fn from(value: Coordinate) -> Self {
        Self::Point(value)
    }
}

impl From<Curve> for GmlGeometry {
    fn from(value: Curve) -> Self {
        Self::Curve(value)
    }
}

impl From<Ring> for GmlGeometry {
    fn from(value: Ring) -> Self {
        Self::Ring(value)
    }
}

impl From<Surface> for GmlGeometry {
    fn from(value: Surface) -> Self {
        Self::Surface(value)
    }
}

impl From<MultiGeometry> for GmlGeometry {
    fn from(value: MultiGeometry) -> Self {
        Self::MultiGeometry(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CurveSegment;

    #[test]
    fn first_mismatch() {
        let multi = MultiGeometry::new(
            CollectionType::MultiPoint,
            vec![
                Coordinate::new(0.0, 0.0).into(),
                GmlGeometry::LineString(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]),
                Coordinate::new(1.0, 1.0).into(),
            ],
        );

        assert_eq!(
            multi.first_mismatch().map(GmlGeometry::kind),
            Some(GeometryKind::LineString)
        );

        let multi = MultiGeometry::new(CollectionType::MultiPoint, vec![]);
        assert!(multi.first_mismatch().is_none());
    }

    #[test]
    fn nested_arcs_are_found() {
        let ring = Ring::new(Curve::new(vec![CurveSegment::Circle {
            a: Coordinate::new(0.0, 0.0),
            b: Coordinate::new(1.0, 1.0),
            c: Coordinate::new(2.0, 0.0),
        }]));
        let multi = MultiGeometry::new(
            CollectionType::Generic,
            vec![Coordinate::new(5.0, 5.0).into(), Surface::from(ring).into()],
        );

        assert!(GmlGeometry::from(multi).has_arcs());
        assert!(!GmlGeometry::Point(Coordinate::new(0.0, 0.0)).has_arcs());
    }
}
