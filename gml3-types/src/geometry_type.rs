//! Tags describing geometry nodes and collections.
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Kind of a [`GmlGeometry`](crate::GmlGeometry) node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum GeometryKind {
    /// [`GmlGeometry::Point`](crate::GmlGeometry::Point).
    Point,
    /// [`GmlGeometry::LineString`](crate::GmlGeometry::LineString).
    LineString,
    /// [`GmlGeometry::Curve`](crate::GmlGeometry::Curve).
    Curve,
    /// [`GmlGeometry::Ring`](crate::GmlGeometry::Ring).
    Ring,
    /// [`GmlGeometry::Surface`](crate::GmlGeometry::Surface).
    Surface,
    /// [`GmlGeometry::MultiGeometry`](crate::GmlGeometry::MultiGeometry) of the given member type.
    Collection(CollectionType),
}

/// Declared member type of a [`MultiGeometry`](crate::MultiGeometry).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CollectionType {
    /// Only points.
    MultiPoint,
    /// Only line strings, curves or rings.
    MultiCurve,
    /// Only surfaces.
    MultiSurface,
    /// Any geometries, including other collections.
    #[default]
    Generic,
}

impl CollectionType {
    /// Whether a member of the given kind can be a part of a collection of this type.
    pub fn accepts(&self, kind: GeometryKind) -> bool {
        match self {
            CollectionType::MultiPoint => kind == GeometryKind::Point,
            CollectionType::MultiCurve => matches!(
                kind,
                GeometryKind::LineString | GeometryKind::Curve | GeometryKind::Ring
            ),
            CollectionType::MultiSurface => kind == GeometryKind::Surface,
            CollectionType::Generic => true,
        }
    }
}

impl Display for GeometryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::Point => write!(f, "Point"),
            GeometryKind::LineString => write!(f, "LineString"),
            GeometryKind::Curve => write!(f, "Curve"),
            GeometryKind::Ring => write!(f, "Ring"),
            GeometryKind::Surface => write!(f, "Surface"),
            GeometryKind::Collection(collection) => write!(f, "{collection}"),
        }
    }
}

impl Display for CollectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionType::MultiPoint => write!(f, "MultiPoint"),
            CollectionType::MultiCurve => write!(f, "MultiCurve"),
            CollectionType::MultiSurface => write!(f, "MultiSurface"),
            CollectionType::Generic => write!(f, "MultiGeometry"),
        }
    }
}
