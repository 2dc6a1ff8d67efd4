use geo_types::Geometry;

/// Result of parsing: a planar geometry made of straight segments, tagged with a spatial reference identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarGeometry {
    /// Spatial reference identifier of the coordinates.
    pub srid: i32,
    /// The geometry.
    pub geometry: Geometry<f64>,
}

impl PlanarGeometry {
    /// Creates a new instance.
    pub fn new(srid: i32, geometry: Geometry<f64>) -> Self {
        Self { srid, geometry }
    }

    /// Returns the geometry, dropping the SRID.
    pub fn into_geometry(self) -> Geometry<f64> {
        self.geometry
    }
}

impl From<PlanarGeometry> for Geometry<f64> {
    fn from(value: PlanarGeometry) -> Self {
        value.geometry
    }
}
