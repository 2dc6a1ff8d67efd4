use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Version of the GML schema a parser reads.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GmlVersion {
    /// GML 3.1.1, namespace `http://www.opengis.net/gml`.
    V3_1_1,
    /// GML 3.2.1, namespace `http://www.opengis.net/gml/3.2`.
    #[default]
    V3_2_1,
}

impl GmlVersion {
    /// Namespace URI of the geometry elements.
    pub fn namespace(&self) -> &'static str {
        match self {
            GmlVersion::V3_1_1 => "http://www.opengis.net/gml",
            GmlVersion::V3_2_1 => "http://www.opengis.net/gml/3.2",
        }
    }

    /// Identifier of a parser for this version.
    pub fn parser_name(&self) -> &'static str {
        match self {
            GmlVersion::V3_1_1 => "GML3_1_1_Parser",
            GmlVersion::V3_2_1 => "GML3_2_1_Parser",
        }
    }
}

impl Display for GmlVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GmlVersion::V3_1_1 => write!(f, "GML 3.1.1"),
            GmlVersion::V3_2_1 => write!(f, "GML 3.2.1"),
        }
    }
}

/// Role of an element in the geometry vocabulary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ElementKind {
    Point,
    LineString,
    LinearRing,
    Ring,
    Curve,
    CompositeCurve,
    Polygon,
    Surface,
    PolygonPatch,
    MultiPoint,
    MultiCurve,
    MultiLineString,
    MultiSurface,
    MultiPolygon,
    MultiGeometry,

    Segments,
    Patches,
    LineStringSegment,
    Arc,
    ArcString,
    Circle,
    ArcByCenterPoint,
    CircleByCenterPoint,

    Exterior,
    Interior,
    PointMember,
    PointMembers,
    CurveMember,
    CurveMembers,
    SurfaceMember,
    SurfaceMembers,
    GeometryMember,
    GeometryMembers,
    PointProperty,

    Pos,
    PosList,
    Coordinates,
    Radius,
    StartAngle,
    EndAngle,

    /// Descriptive elements (`name`, `description` etc.) that do not affect the geometry.
    Metadata,
}

impl ElementKind {
    pub(crate) fn is_geometry(&self) -> bool {
        matches!(
            self,
            ElementKind::Point
                | ElementKind::LineString
                | ElementKind::LinearRing
                | ElementKind::Ring
                | ElementKind::Curve
                | ElementKind::CompositeCurve
                | ElementKind::Polygon
                | ElementKind::Surface
                | ElementKind::MultiPoint
                | ElementKind::MultiCurve
                | ElementKind::MultiLineString
                | ElementKind::MultiSurface
                | ElementKind::MultiPolygon
                | ElementKind::MultiGeometry
        )
    }
}

const COMMON_ELEMENTS: &[(&str, ElementKind)] = &[
    ("Point", ElementKind::Point),
    ("LineString", ElementKind::LineString),
    ("LinearRing", ElementKind::LinearRing),
    ("Ring", ElementKind::Ring),
    ("Curve", ElementKind::Curve),
    ("CompositeCurve", ElementKind::CompositeCurve),
    ("Polygon", ElementKind::Polygon),
    ("Surface", ElementKind::Surface),
    ("PolygonPatch", ElementKind::PolygonPatch),
    ("MultiPoint", ElementKind::MultiPoint),
    ("MultiCurve", ElementKind::MultiCurve),
    ("MultiSurface", ElementKind::MultiSurface),
    ("MultiGeometry", ElementKind::MultiGeometry),
    ("segments", ElementKind::Segments),
    ("patches", ElementKind::Patches),
    ("LineStringSegment", ElementKind::LineStringSegment),
    ("Arc", ElementKind::Arc),
    ("ArcString", ElementKind::ArcString),
    ("Circle", ElementKind::Circle),
    ("ArcByCenterPoint", ElementKind::ArcByCenterPoint),
    ("CircleByCenterPoint", ElementKind::CircleByCenterPoint),
    ("exterior", ElementKind::Exterior),
    ("interior", ElementKind::Interior),
    ("pointMember", ElementKind::PointMember),
    ("pointMembers", ElementKind::PointMembers),
    ("curveMember", ElementKind::CurveMember),
    ("curveMembers", ElementKind::CurveMembers),
    ("surfaceMember", ElementKind::SurfaceMember),
    ("surfaceMembers", ElementKind::SurfaceMembers),
    ("geometryMember", ElementKind::GeometryMember),
    ("geometryMembers", ElementKind::GeometryMembers),
    ("pointProperty", ElementKind::PointProperty),
    ("pos", ElementKind::Pos),
    ("posList", ElementKind::PosList),
    ("coordinates", ElementKind::Coordinates),
    ("radius", ElementKind::Radius),
    ("startAngle", ElementKind::StartAngle),
    ("endAngle", ElementKind::EndAngle),
    ("name", ElementKind::Metadata),
    ("description", ElementKind::Metadata),
    ("descriptionReference", ElementKind::Metadata),
    ("metaDataProperty", ElementKind::Metadata),
];

/// Elements deprecated in 3.1.1 and removed in 3.2.1.
const V3_1_1_ELEMENTS: &[(&str, ElementKind)] = &[
    ("MultiLineString", ElementKind::MultiLineString),
    ("MultiPolygon", ElementKind::MultiPolygon),
    ("lineStringMember", ElementKind::CurveMember),
    ("polygonMember", ElementKind::SurfaceMember),
    ("outerBoundaryIs", ElementKind::Exterior),
    ("innerBoundaryIs", ElementKind::Interior),
    ("pointRep", ElementKind::PointProperty),
];

const V3_2_1_ELEMENTS: &[(&str, ElementKind)] = &[("identifier", ElementKind::Metadata)];

/// Lookup table of the GML elements a parser understands.
///
/// The vocabulary is built once for a parser and shared by all the documents it reads.
#[derive(Debug)]
pub(crate) struct Vocabulary {
    version: GmlVersion,
    elements: HashMap<&'static str, ElementKind>,
}

impl Vocabulary {
    pub(crate) fn new(version: GmlVersion) -> Result<Self, ConfigError> {
        let version_elements = match version {
            GmlVersion::V3_1_1 => V3_1_1_ELEMENTS,
            GmlVersion::V3_2_1 => V3_2_1_ELEMENTS,
        };

        let mut elements = HashMap::with_capacity(COMMON_ELEMENTS.len() + version_elements.len());
        for (name, kind) in COMMON_ELEMENTS.iter().chain(version_elements) {
            if elements.insert(*name, *kind).is_some() {
                return Err(ConfigError::Vocabulary(format!(
                    "element '{name}' is defined more than once for {version}"
                )));
            }
        }

        log::debug!(
            "Created {version} vocabulary with {} elements",
            elements.len()
        );

        Ok(Self { version, elements })
    }

    pub(crate) fn version(&self) -> GmlVersion {
        self.version
    }

    /// Kind of the element with the given namespace and local name, if it belongs to the vocabulary.
    pub(crate) fn lookup(&self, namespace: Option<&str>, local_name: &str) -> Option<ElementKind> {
        if namespace != Some(self.version.namespace()) {
            return None;
        }

        self.elements.get(local_name).copied()
    }
}
