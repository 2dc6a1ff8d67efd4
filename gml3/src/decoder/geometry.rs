use std::f64::consts::TAU;

use gml3_types::{
    CollectionType, Coordinate, Curve, CurveSegment, GmlGeometry, MultiGeometry, Ring, Surface,
};

use super::element::Element;
use super::positions::{
    dimension, parse_coordinates, parse_number, parse_pos, parse_pos_list, DEFAULT_DIMENSION,
};
use super::vocabulary::{ElementKind, Vocabulary};
use crate::error::DocumentError;

/// Turns an element tree into a [`GmlGeometry`].
pub(crate) struct TreeDecoder<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> TreeDecoder<'a> {
    pub(crate) fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Decodes the geometry described by the root element of a document.
    pub(crate) fn decode(&self, root: &Element) -> Result<GmlGeometry, DocumentError> {
        match self.kind_of(root) {
            Some(kind) if kind.is_geometry() => self.geometry(root, kind, DEFAULT_DIMENSION),
            _ => Err(DocumentError::UnexpectedRoot(root.name.clone())),
        }
    }

    fn kind_of(&self, element: &Element) -> Option<ElementKind> {
        self.vocabulary
            .lookup(element.namespace.as_deref(), &element.name)
    }

    /// Child elements that describe the geometry, with metadata elements left out.
    fn children<'e>(
        &self,
        element: &'e Element,
    ) -> Result<Vec<(ElementKind, &'e Element)>, DocumentError> {
        let mut children = Vec::with_capacity(element.children.len());
        for child in &element.children {
            match self.kind_of(child) {
                Some(ElementKind::Metadata) => {}
                Some(kind) => children.push((kind, child)),
                None => return Err(unexpected(child, element)),
            }
        }

        Ok(children)
    }

    /// The only child of the element.
    fn single_child<'e>(
        &self,
        element: &'e Element,
        expected: &str,
    ) -> Result<(ElementKind, &'e Element), DocumentError> {
        let mut children = self.children(element)?.into_iter();
        let first = children.next().ok_or_else(|| missing(expected, element))?;
        if let Some((_, extra)) = children.next() {
            return Err(unexpected(extra, element));
        }

        Ok(first)
    }

    fn geometry(
        &self,
        element: &Element,
        kind: ElementKind,
        inherited: usize,
    ) -> Result<GmlGeometry, DocumentError> {
        let dim = dimension(element, inherited)?;
        let geometry = match kind {
            ElementKind::Point => GmlGeometry::Point(self.point(element, dim)?),
            ElementKind::LineString => GmlGeometry::LineString(self.positions(element, dim)?),
            ElementKind::LinearRing => {
                GmlGeometry::Ring(Ring::linear(self.positions(element, dim)?))
            }
            ElementKind::Ring => GmlGeometry::Ring(Ring::new(self.curve_members(element, dim)?)),
            ElementKind::Curve => GmlGeometry::Curve(self.curve(element, dim)?),
            ElementKind::CompositeCurve => GmlGeometry::Curve(self.curve_members(element, dim)?),
            ElementKind::Polygon => GmlGeometry::Surface(self.polygon(element, dim)?),
            ElementKind::Surface => self.surface(element, dim)?,
            ElementKind::MultiPoint => {
                self.collection(element, CollectionType::MultiPoint, dim)?
            }
            ElementKind::MultiCurve | ElementKind::MultiLineString => {
                self.collection(element, CollectionType::MultiCurve, dim)?
            }
            ElementKind::MultiSurface | ElementKind::MultiPolygon => {
                self.collection(element, CollectionType::MultiSurface, dim)?
            }
            ElementKind::MultiGeometry => self.collection(element, CollectionType::Generic, dim)?,
            _ => return Err(DocumentError::UnexpectedRoot(element.name.clone())),
        };

        Ok(geometry)
    }

    fn point(&self, element: &Element, dim: usize) -> Result<Coordinate, DocumentError> {
        let (kind, child) = self.single_child(element, "a 'pos' or 'coordinates' element")?;
        match kind {
            ElementKind::Pos => parse_pos(child, dim),
            ElementKind::Coordinates => match parse_coordinates(child)?.as_slice() {
                [position] => Ok(*position),
                positions => Err(DocumentError::InvalidCoordinates {
                    element: element.name.clone(),
                    reason: format!("expected 1 position, found {}", positions.len()),
                }),
            },
            _ => Err(unexpected(child, element)),
        }
    }

    /// Positions given by any combination of position carriers.
    fn positions(&self, element: &Element, dim: usize) -> Result<Vec<Coordinate>, DocumentError> {
        let mut positions = vec![];
        for (kind, child) in self.children(element)? {
            match kind {
                ElementKind::Pos => positions.push(parse_pos(child, dim)?),
                ElementKind::PosList => positions.extend(parse_pos_list(child, dim)?),
                ElementKind::Coordinates => positions.extend(parse_coordinates(child)?),
                ElementKind::PointProperty => {
                    let (kind, point) = self.single_child(child, "a 'Point' element")?;
                    if kind != ElementKind::Point {
                        return Err(unexpected(point, child));
                    }
                    positions.push(self.point(point, dimension(point, dim)?)?);
                }
                _ => return Err(unexpected(child, element)),
            }
        }

        Ok(positions)
    }

    fn curve(&self, element: &Element, dim: usize) -> Result<Curve, DocumentError> {
        let (kind, segments_element) = self.single_child(element, "a 'segments' element")?;
        if kind != ElementKind::Segments {
            return Err(unexpected(segments_element, element));
        }

        let mut segments = vec![];
        for (kind, child) in self.children(segments_element)? {
            let dim = dimension(child, dim)?;
            match kind {
                ElementKind::LineStringSegment => {
                    segments.push(CurveSegment::LineString(self.positions(child, dim)?));
                }
                ElementKind::Arc => {
                    let [start, mid, end] = self.exact_positions::<3>(child, dim)?;
                    segments.push(CurveSegment::Arc { start, mid, end });
                }
                ElementKind::Circle => {
                    let [a, b, c] = self.exact_positions::<3>(child, dim)?;
                    segments.push(CurveSegment::Circle { a, b, c });
                }
                ElementKind::ArcString => {
                    let positions = self.positions(child, dim)?;
                    if positions.len() < 3 || positions.len() % 2 == 0 {
                        return Err(DocumentError::InvalidCoordinates {
                            element: child.name.clone(),
                            reason: format!(
                                "expected an odd number of at least 3 positions, found {}",
                                positions.len()
                            ),
                        });
                    }

                    segments.extend(positions.windows(3).step_by(2).map(|w| CurveSegment::Arc {
                        start: w[0],
                        mid: w[1],
                        end: w[2],
                    }));
                }
                ElementKind::ArcByCenterPoint => {
                    segments.push(self.arc_by_center(child, dim, false)?)
                }
                ElementKind::CircleByCenterPoint => {
                    segments.push(self.arc_by_center(child, dim, true)?)
                }
                _ => return Err(unexpected(child, segments_element)),
            }
        }

        if segments.is_empty() {
            return Err(missing("at least one segment", segments_element));
        }

        Ok(Curve::new(segments))
    }

    fn exact_positions<const N: usize>(
        &self,
        element: &Element,
        dim: usize,
    ) -> Result<[Coordinate; N], DocumentError> {
        let positions = self.positions(element, dim)?;
        let count = positions.len();
        positions
            .try_into()
            .map_err(|_| DocumentError::InvalidCoordinates {
                element: element.name.clone(),
                reason: format!("expected {N} positions, found {count}"),
            })
    }

    fn arc_by_center(
        &self,
        element: &Element,
        dim: usize,
        full_circle: bool,
    ) -> Result<CurveSegment, DocumentError> {
        let mut center = vec![];
        let mut radius = None;
        let mut start_angle = None;
        let mut end_angle = None;

        for (kind, child) in self.children(element)? {
            match kind {
                ElementKind::Pos => center.push(parse_pos(child, dim)?),
                ElementKind::PosList => center.extend(parse_pos_list(child, dim)?),
                ElementKind::Coordinates => center.extend(parse_coordinates(child)?),
                ElementKind::PointProperty => {
                    let (_, point) = self.single_child(child, "a 'Point' element")?;
                    center.push(self.point(point, dimension(point, dim)?)?);
                }
                ElementKind::Radius => radius = Some(parse_number(&child.text)?),
                ElementKind::StartAngle => start_angle = Some(angle(child)?),
                ElementKind::EndAngle if !full_circle => end_angle = Some(angle(child)?),
                _ => return Err(unexpected(child, element)),
            }
        }

        let center = match center.as_slice() {
            [center] => *center,
            positions => {
                return Err(DocumentError::InvalidCoordinates {
                    element: element.name.clone(),
                    reason: format!("expected 1 center position, found {}", positions.len()),
                })
            }
        };
        let radius = radius.ok_or_else(|| missing("a 'radius' element", element))?;

        let (start_angle, sweep_angle) = if full_circle {
            (start_angle.unwrap_or(0.0), TAU)
        } else {
            let start = start_angle.ok_or_else(|| missing("a 'startAngle' element", element))?;
            let end = end_angle.ok_or_else(|| missing("an 'endAngle' element", element))?;
            (start, end - start)
        };

        Ok(CurveSegment::ArcByCenter {
            center,
            radius,
            start_angle,
            sweep_angle,
        })
    }

    /// Concatenation of the curves in `curveMember` children, as in `Ring` and `CompositeCurve`.
    fn curve_members(&self, element: &Element, dim: usize) -> Result<Curve, DocumentError> {
        let mut curve = Curve::default();
        for (kind, member) in self.children(element)? {
            if kind != ElementKind::CurveMember {
                return Err(unexpected(member, element));
            }

            let (kind, child) = self.single_child(member, "a curve element")?;
            match kind {
                ElementKind::LineString | ElementKind::Curve | ElementKind::CompositeCurve => {
                    match self.geometry(child, kind, dim)? {
                        GmlGeometry::LineString(points) => curve.append(Curve::straight(points)),
                        GmlGeometry::Curve(c) => curve.append(c),
                        _ => return Err(unexpected(child, member)),
                    }
                }
                _ => return Err(unexpected(child, member)),
            }
        }

        if curve.segments.is_empty() {
            return Err(missing("at least one 'curveMember' element", element));
        }

        Ok(curve)
    }

    fn polygon(&self, element: &Element, dim: usize) -> Result<Surface, DocumentError> {
        let mut exterior = None;
        let mut interiors = vec![];

        for (kind, child) in self.children(element)? {
            match kind {
                ElementKind::Exterior if exterior.is_none() => {
                    exterior = Some(self.boundary(child, dim)?)
                }
                ElementKind::Interior => interiors.push(self.boundary(child, dim)?),
                _ => return Err(unexpected(child, element)),
            }
        }

        let exterior = exterior.ok_or_else(|| missing("an 'exterior' element", element))?;
        Ok(Surface::new(exterior, interiors))
    }

    /// Ring inside an `exterior` or `interior` element.
    fn boundary(&self, element: &Element, dim: usize) -> Result<Ring, DocumentError> {
        let (kind, child) = self.single_child(element, "a 'LinearRing' or 'Ring' element")?;
        match kind {
            ElementKind::LinearRing | ElementKind::Ring => match self.geometry(child, kind, dim)? {
                GmlGeometry::Ring(ring) => Ok(ring),
                _ => Err(unexpected(child, element)),
            },
            _ => Err(unexpected(child, element)),
        }
    }

    /// A surface of one patch is a single surface, one with several patches is a collection of them.
    fn surface(&self, element: &Element, dim: usize) -> Result<GmlGeometry, DocumentError> {
        let (kind, patches) = self.single_child(element, "a 'patches' element")?;
        if kind != ElementKind::Patches {
            return Err(unexpected(patches, element));
        }

        let mut surfaces = vec![];
        for (kind, patch) in self.children(patches)? {
            if kind != ElementKind::PolygonPatch {
                return Err(unexpected(patch, patches));
            }
            surfaces.push(self.polygon(patch, dimension(patch, dim)?)?);
        }

        match surfaces.len() {
            0 => Err(missing("at least one 'PolygonPatch' element", patches)),
            1 => Ok(surfaces.remove(0).into()),
            _ => Ok(MultiGeometry::new(
                CollectionType::MultiSurface,
                surfaces.into_iter().map(GmlGeometry::from).collect(),
            )
            .into()),
        }
    }

    fn collection(
        &self,
        element: &Element,
        collection_type: CollectionType,
        dim: usize,
    ) -> Result<GmlGeometry, DocumentError> {
        let (single_member, multiple_members) = match collection_type {
            CollectionType::MultiPoint => (ElementKind::PointMember, ElementKind::PointMembers),
            CollectionType::MultiCurve => (ElementKind::CurveMember, ElementKind::CurveMembers),
            CollectionType::MultiSurface => {
                (ElementKind::SurfaceMember, ElementKind::SurfaceMembers)
            }
            CollectionType::Generic => {
                (ElementKind::GeometryMember, ElementKind::GeometryMembers)
            }
        };

        let mut members = vec![];
        for (kind, member) in self.children(element)? {
            let geometries = if kind == single_member {
                vec![self.single_child(member, "a geometry element")?]
            } else if kind == multiple_members {
                self.children(member)?
            } else {
                return Err(unexpected(member, element));
            };

            for (kind, child) in geometries {
                if !kind.is_geometry() {
                    return Err(unexpected(child, member));
                }

                match self.geometry(child, kind, dim)? {
                    GmlGeometry::MultiGeometry(patches)
                        if kind == ElementKind::Surface
                            && collection_type == CollectionType::MultiSurface =>
                    {
                        members.extend(patches.members)
                    }
                    geometry => members.push(geometry),
                }
            }
        }

        Ok(MultiGeometry::new(collection_type, members).into())
    }
}

/// Angle in radians. Degrees are assumed when the unit of measure is not given.
fn angle(element: &Element) -> Result<f64, DocumentError> {
    let value = parse_number(&element.text)?;
    match element.attribute("uom").map(str::trim) {
        None | Some("deg") | Some("degree") | Some("urn:ogc:def:uom:EPSG::9102") => {
            Ok(value.to_radians())
        }
        Some("rad") | Some("radian") | Some("urn:ogc:def:uom:EPSG::9101") => Ok(value),
        Some(uom) => Err(DocumentError::InvalidAttribute {
            name: "uom".into(),
            value: uom.into(),
        }),
    }
}

fn unexpected(found: &Element, parent: &Element) -> DocumentError {
    DocumentError::UnexpectedElement {
        found: found.name.clone(),
        parent: parent.name.clone(),
    }
}

fn missing(expected: &str, parent: &Element) -> DocumentError {
    DocumentError::MissingElement {
        expected: expected.into(),
        parent: parent.name.clone(),
    }
}
