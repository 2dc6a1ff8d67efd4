//! Conversion of the geometry tree into planar geometries.
//!
//! Every node of the tree is converted recursively. Arcs are replaced by chords, all coordinates are snapped to the
//! precision model of the [`ConversionContext`] and the result is checked by the [validity](crate::validity)
//! checker before it is returned.

use geo_types::{
    Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon,
};
use gml3_types::{CollectionType, GmlGeometry, MultiGeometry, Surface};

use crate::arc::ArcApproximator;
use crate::context::ConversionContext;
use crate::error::{GeometryError, GeometryErrorKind, ParseError};
use crate::planar::PlanarGeometry;
use crate::validity;

mod curve;

/// Converts a geometry tree into a validated planar geometry using the given context.
pub fn convert(
    geometry: &GmlGeometry,
    context: &ConversionContext,
) -> Result<PlanarGeometry, ParseError> {
    Converter::new(context).convert(geometry)
}

/// Converts geometry trees with a fixed [`ConversionContext`].
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    context: &'a ConversionContext,
    approximator: ArcApproximator,
}

impl<'a> Converter<'a> {
    /// Creates a new converter.
    pub fn new(context: &'a ConversionContext) -> Self {
        Self {
            context,
            approximator: ArcApproximator::from_context(context),
        }
    }

    /// Converts the tree and checks validity of the result.
    ///
    /// The result is tagged with the SRID of the context. Nested geometries of collections are not tagged.
    pub fn convert(&self, geometry: &GmlGeometry) -> Result<PlanarGeometry, ParseError> {
        let geometry = self.geometry(geometry)?;
        validity::check(&geometry)?;

        Ok(PlanarGeometry::new(self.context.srid, geometry))
    }

    fn geometry(&self, geometry: &GmlGeometry) -> Result<Geometry<f64>, GeometryError> {
        let converted = match geometry {
            GmlGeometry::Point(position) => Point::from(self.coordinate(position)?).into(),
            GmlGeometry::LineString(positions) => LineString::new(self.points(positions)?).into(),
            GmlGeometry::Curve(curve) => LineString::new(self.flatten(curve)?).into(),
            GmlGeometry::Ring(ring) => LineString::new(self.ring(ring)?).into(),
            GmlGeometry::Surface(surface) => self.polygon(surface)?.into(),
            GmlGeometry::MultiGeometry(multi) => self.collection(multi)?,
        };

        Ok(converted)
    }

    fn polygon(&self, surface: &Surface) -> Result<Polygon<f64>, GeometryError> {
        let exterior = LineString::new(self.ring(&surface.exterior)?);
        let interiors = surface
            .interiors
            .iter()
            .map(|ring| self.ring(ring).map(LineString::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Polygon::new(exterior, interiors))
    }

    fn line(&self, geometry: &GmlGeometry) -> Result<LineString<f64>, GeometryError> {
        let points = match geometry {
            GmlGeometry::LineString(positions) => self.points(positions)?,
            GmlGeometry::Curve(curve) => self.flatten(curve)?,
            GmlGeometry::Ring(ring) => self.ring(ring)?,
            other => return Err(mismatch(other, CollectionType::MultiCurve)),
        };

        Ok(LineString::new(points))
    }

    fn collection(&self, multi: &MultiGeometry) -> Result<Geometry<f64>, GeometryError> {
        if let Some(member) = multi.first_mismatch() {
            return Err(mismatch(member, multi.collection_type));
        }

        let members = &multi.members;
        let converted = match multi.collection_type {
            CollectionType::MultiPoint => MultiPoint(
                members
                    .iter()
                    .map(|member| match member {
                        GmlGeometry::Point(position) => self.coordinate(position).map(Point::from),
                        other => Err(mismatch(other, CollectionType::MultiPoint)),
                    })
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            CollectionType::MultiCurve => MultiLineString(
                members
                    .iter()
                    .map(|member| self.line(member))
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            CollectionType::MultiSurface => MultiPolygon(
                members
                    .iter()
                    .map(|member| match member {
                        GmlGeometry::Surface(surface) => self.polygon(surface),
                        other => Err(mismatch(other, CollectionType::MultiSurface)),
                    })
                    .collect::<Result<_, _>>()?,
            )
            .into(),
            CollectionType::Generic => Geometry::GeometryCollection(GeometryCollection(
                members
                    .iter()
                    .map(|member| self.geometry(member))
                    .collect::<Result<_, _>>()?,
            )),
        };

        Ok(converted)
    }
}

fn mismatch(member: &GmlGeometry, collection_type: CollectionType) -> GeometryError {
    GeometryError::new(
        GeometryErrorKind::TypeMismatch,
        format!(
            "{} cannot be a member of {collection_type}",
            member.kind()
        ),
    )
}
