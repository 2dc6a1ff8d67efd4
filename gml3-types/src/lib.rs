//! Typed geometry tree of GML 3 geometry documents.
//!
//! The types in this crate mirror the geometry vocabulary of GML: points, line strings, curves made of straight and
//! circular segments, rings, surfaces and collections of those. They are pure data. Turning a document into a
//! [`GmlGeometry`] and a [`GmlGeometry`] into a planar geometry is done by the `gml3` crate.
//!
//! ```
//! use gml3_types::{Coordinate, Curve, CurveSegment, GmlGeometry};
//!
//! let quarter_circle = Curve::new(vec![CurveSegment::Arc {
//!     start: Coordinate::new(1.0, 0.0),
//!     mid: Coordinate::new(0.5f64.sqrt(), 0.5f64.sqrt()),
//!     end: Coordinate::new(0.0, 1.0),
//! }]);
//!
//! let geometry = GmlGeometry::Curve(quarter_circle);
//! assert!(geometry.has_arcs());
//! ```

mod coordinate;
pub use coordinate::Coordinate;

mod curve;
pub use curve::{Curve, CurveSegment, Ring};

mod surface;
pub use surface::Surface;

mod geometry;
pub use geometry::{GmlGeometry, MultiGeometry};

pub mod error;
pub mod geometry_type;
pub mod orient;
pub mod precision;

#[cfg(feature = "geo-types")]
mod geo_types;

pub use geometry_type::{CollectionType, GeometryKind};
pub use orient::Orientation;
pub use precision::PrecisionModel;
