//! Error types used by the crate.
//!
//! Parsing can fail on three levels, each with its own error type:
//!
//! 1. [`DocumentError`] - the input is not well-formed XML, or does not follow the GML geometry vocabulary.
//! 2. [`GeometryError`] - the document is structurally fine, but describes a geometry that breaks a structural
//!    rule before it is even assembled: a ring that does not close, a degenerate arc, a collection with a member of
//!    a wrong type.
//! 3. [`InvalidGeometryError`] - the geometry was assembled, but it does not pass validity checks (for example, its
//!    boundary intersects itself).
//!
//! The parser reports any of them wrapped into [`ParseError`].

use std::fmt::{Display, Formatter};

use geo_types::Coord;
use gml3_types::error::Gml3TypesError;
use thiserror::Error;

/// Error returned by the parser. Wraps the error of the level that rejected the document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input string is empty or contains only whitespace.
    #[error("empty GML document provided")]
    EmptyInput,
    /// Input cannot be deserialized into GML geometry elements.
    #[error("input cannot be deserialized to GML geometry elements: {0}")]
    Document(#[from] DocumentError),
    /// Geometry described by the input breaks a structural rule.
    #[error("input is not a valid geometry: {0}")]
    Geometry(#[from] GeometryError),
    /// Assembled geometry is invalid.
    #[error("input is not a valid geometry: {0}")]
    InvalidGeometry(#[from] InvalidGeometryError),
}

/// Level of the pipeline a [`ParseError`] originates from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorTier {
    /// Document structure.
    Document,
    /// Structural geometry rules.
    Geometry,
    /// Validity of the assembled geometry.
    Validity,
}

impl ParseError {
    /// Level of the pipeline that rejected the input.
    pub fn tier(&self) -> ErrorTier {
        match self {
            ParseError::EmptyInput | ParseError::Document(_) => ErrorTier::Document,
            ParseError::Geometry(_) => ErrorTier::Geometry,
            ParseError::InvalidGeometry(_) => ErrorTier::Validity,
        }
    }
}

/// Document is not well-formed or does not follow the GML vocabulary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    /// XML syntax error.
    #[error("malformed XML: {0}")]
    Xml(String),
    /// Failed to read the document from the source.
    #[error("failed to read document: {0}")]
    Io(String),
    /// Document does not contain any elements.
    #[error("document does not contain any elements")]
    Empty,
    /// More than one top level element.
    #[error("document has more than one root element")]
    MultipleRoots,
    /// Elements are nested deeper than the given limit.
    #[error("document nesting exceeds {0} levels")]
    TooDeep(usize),
    /// Root element is not a geometry.
    #[error("root element '{0}' is not a GML geometry")]
    UnexpectedRoot(String),
    /// Element that is not allowed at its position.
    #[error("unexpected element '{found}' in '{parent}'")]
    UnexpectedElement {
        /// Name of the offending element.
        found: String,
        /// Name of the parent element.
        parent: String,
    },
    /// Required child element is not present.
    #[error("element '{parent}' must contain {expected}")]
    MissingElement {
        /// Description of the expected element.
        expected: String,
        /// Name of the parent element.
        parent: String,
    },
    /// Value cannot be parsed as a number.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    /// Attribute has a value that cannot be used.
    #[error("invalid value '{value}' of attribute '{name}'")]
    InvalidAttribute {
        /// Attribute name.
        name: String,
        /// Attribute value.
        value: String,
    },
    /// Positions cannot be read from the element.
    #[error("invalid coordinates in '{element}': {reason}")]
    InvalidCoordinates {
        /// Name of the element.
        element: String,
        /// What is wrong with the positions.
        reason: String,
    },
}

impl From<quick_xml::Error> for DocumentError {
    fn from(value: quick_xml::Error) -> Self {
        match value {
            quick_xml::Error::Io(e) => Self::Io(e.to_string()),
            e => Self::Xml(e.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for DocumentError {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(value.to_string())
    }
}

/// Classification of a [`GeometryError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GeometryErrorKind {
    /// First and last positions of a ring differ.
    NotClosed,
    /// Arc parameters do not define an arc.
    DegenerateArc,
    /// Collection member type differs from the declared collection type.
    TypeMismatch,
    /// Not enough positions for the geometry type.
    TooFewPoints,
    /// Consecutive segments of a curve do not share the end point.
    DisconnectedSegments,
    /// Coordinate value is NaN or infinite.
    NonFiniteCoordinate,
    /// Arc cannot be approximated within the configured limits.
    ArcApproximation,
}

impl Display for GeometryErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryErrorKind::NotClosed => write!(f, "ring is not closed"),
            GeometryErrorKind::DegenerateArc => write!(f, "degenerate arc"),
            GeometryErrorKind::TypeMismatch => write!(f, "type mismatch"),
            GeometryErrorKind::TooFewPoints => write!(f, "too few points"),
            GeometryErrorKind::DisconnectedSegments => write!(f, "disconnected segments"),
            GeometryErrorKind::NonFiniteCoordinate => write!(f, "non-finite coordinate"),
            GeometryErrorKind::ArcApproximation => write!(f, "arc approximation failed"),
        }
    }
}

/// Geometry breaks a structural rule.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct GeometryError {
    /// Classification.
    pub kind: GeometryErrorKind,
    /// Details.
    pub message: String,
}

impl GeometryError {
    /// Creates a new error.
    pub fn new(kind: GeometryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Classification of an [`InvalidGeometryError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValidityErrorKind {
    /// Boundary of a geometry touches or crosses itself.
    SelfIntersecting,
    /// A hole is not inside the exterior ring.
    HoleOutsideShell,
    /// A hole is inside another hole.
    NestedHoles,
    /// A polygon of a multipolygon is inside another one.
    NestedShells,
    /// Ring is not closed.
    RingNotClosed,
    /// Not enough points for a component.
    TooFewPoints,
    /// Coordinate value is NaN or infinite.
    NonFiniteCoordinate,
}

impl Display for ValidityErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidityErrorKind::SelfIntersecting => write!(f, "self-intersection"),
            ValidityErrorKind::HoleOutsideShell => write!(f, "hole lies outside shell"),
            ValidityErrorKind::NestedHoles => write!(f, "nested holes"),
            ValidityErrorKind::NestedShells => write!(f, "nested shells"),
            ValidityErrorKind::RingNotClosed => write!(f, "ring is not closed"),
            ValidityErrorKind::TooFewPoints => write!(f, "too few points in geometry component"),
            ValidityErrorKind::NonFiniteCoordinate => write!(f, "invalid coordinate"),
        }
    }
}

/// Assembled geometry failed validity checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct InvalidGeometryError {
    /// Classification given by the validity checker.
    pub kind: ValidityErrorKind,
    /// Location of the problem, if known.
    pub location: Option<Coord<f64>>,
}

impl InvalidGeometryError {
    /// Creates a new error.
    pub fn new(kind: ValidityErrorKind, location: Option<Coord<f64>>) -> Self {
        Self { kind, location }
    }
}

impl Display for InvalidGeometryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.location {
            Some(c) => write!(f, "{} at or near point ({}, {})", self.kind, c.x, c.y),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Parser cannot be constructed with the given configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Maximum arc approximation error must be a positive number.
    #[error("maximum arc approximation error must be a positive finite number, but is {0}")]
    InvalidTolerance(f64),
    /// Precision model parameters are invalid.
    #[error(transparent)]
    Precision(#[from] Gml3TypesError),
    /// Minimum number of segments for full circles is too small.
    #[error("full circles need at least 3 segments, but minimum is set to {0}")]
    InvalidCircleSegments(usize),
    /// Maximum number of segments per arc is smaller than the minimum for circles.
    #[error("maximum segments per arc ({max}) is less than the minimum for circles ({min})")]
    InvalidMaxSegments {
        /// Configured maximum.
        max: usize,
        /// Configured minimum for full circles.
        min: usize,
    },
    /// Element vocabulary cannot be built.
    #[error("failed to build GML vocabulary: {0}")]
    Vocabulary(String),
}
