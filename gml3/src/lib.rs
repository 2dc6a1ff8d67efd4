//! Parser of GML 3 geometry documents. It reads a single geometry element (GML 3.2.1 or 3.1.1), approximates all
//! circular arcs by straight segments and returns a validated planar geometry tagged with a spatial reference
//! identifier.
//!
//! # Quick start
//!
//! ```
//! use geo_types::Geometry;
//! use gml3::GmlParser;
//!
//! let parser = GmlParser::new(0.001, 28992)?;
//! let result = parser.parse_str(r#"
//!     <gml:Polygon xmlns:gml="http://www.opengis.net/gml/3.2">
//!         <gml:exterior>
//!             <gml:LinearRing>
//!                 <gml:posList>0 0 10 0 10 10 0 10 0 0</gml:posList>
//!             </gml:LinearRing>
//!         </gml:exterior>
//!         <gml:interior>
//!             <gml:LinearRing>
//!                 <gml:posList>2 2 8 2 5 8 2 2</gml:posList>
//!             </gml:LinearRing>
//!         </gml:interior>
//!     </gml:Polygon>
//! "#)?;
//!
//! assert_eq!(result.srid, 28992);
//! let Geometry::Polygon(polygon) = result.geometry else {
//!     panic!("expected a polygon");
//! };
//! assert_eq!(polygon.interiors().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # How it works
//!
//! Parsing is done in three steps, and every step has its own error type:
//!
//! * the document is [decoded](decoder) into a [`GmlGeometry`] tree. Malformed XML and elements that do not belong
//!   to the GML geometry vocabulary are reported as [`DocumentError`];
//! * the tree is [converted](convert) into a [`geo_types::Geometry`]. Arcs are replaced by chords with the
//!   [`ArcApproximator`](arc::ArcApproximator), coordinates are snapped to the [`PrecisionModel`]. Structural
//!   problems, like a ring that is not closed, are reported as [`GeometryError`];
//! * the result is [checked](validity) for validity. Self-intersections and misplaced holes are reported as
//!   [`InvalidGeometryError`].
//!
//! All three are wrapped into [`ParseError`] by the [`GmlParser`].
//!
//! The conversion settings are given by a [`ConversionContext`]. Use [`ParserBuilder`] to create a parser with
//! settings other than the defaults.

pub mod arc;
mod builder;
mod context;
pub mod convert;
pub mod decoder;
pub mod error;
mod parser;
mod planar;
pub mod validity;

pub use builder::ParserBuilder;
pub use context::{
    ConversionContext, DEFAULT_ARC_APPROXIMATION_ERROR, DEFAULT_MAX_ARC_SEGMENTS,
    DEFAULT_MIN_CIRCLE_SEGMENTS, DEFAULT_SRID,
};
pub use decoder::GmlVersion;
pub use error::{ConfigError, DocumentError, GeometryError, InvalidGeometryError, ParseError};
pub use parser::GmlParser;
pub use planar::PlanarGeometry;

pub use gml3_types::{GmlGeometry, PrecisionModel};

// Reexport gml3_types
pub use gml3_types;
