use gml3_types::PrecisionModel;

use crate::context::ConversionContext;
use crate::decoder::GmlVersion;
use crate::error::ConfigError;
use crate::parser::GmlParser;

/// Constructor for a [`GmlParser`].
///
/// All settings have defaults, so only the ones that differ need to be set. The settings are validated when the
/// parser is built.
///
/// ```
/// use gml3::{GmlVersion, ParserBuilder, PrecisionModel};
///
/// let parser = ParserBuilder::new()
///     .with_version(GmlVersion::V3_1_1)
///     .with_srid(4326)
///     .with_max_arc_approximation_error(0.000_01)
///     .with_precision_model(PrecisionModel::fixed(1e7)?)
///     .build()?;
///
/// assert_eq!(parser.identify(), "GML3_1_1_Parser");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    context: ConversionContext,
    version: GmlVersion,
}

impl ParserBuilder {
    /// Initializes a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum distance between an arc and the chords it is replaced with.
    ///
    /// Defaults to [`DEFAULT_ARC_APPROXIMATION_ERROR`](crate::DEFAULT_ARC_APPROXIMATION_ERROR). The value must be a
    /// positive number, otherwise building the parser will return an error.
    ///
    /// The same distance is used as a tolerance when checking that consecutive segments of a curve are connected
    /// and that rings are closed.
    ///
    /// ```
    /// use gml3::{ConfigError, ParserBuilder};
    ///
    /// let parser = ParserBuilder::new().with_max_arc_approximation_error(0.01).build()?;
    /// assert_eq!(parser.context().max_arc_approximation_error, 0.01);
    ///
    /// let result = ParserBuilder::new().with_max_arc_approximation_error(-1.0).build();
    /// assert!(matches!(result, Err(ConfigError::InvalidTolerance(_))));
    /// # Ok::<(), ConfigError>(())
    /// ```
    pub fn with_max_arc_approximation_error(mut self, max_error: f64) -> Self {
        self.context.max_arc_approximation_error = max_error;
        self
    }

    /// Sets the SRID the parsed geometries are tagged with.
    ///
    /// Defaults to [`DEFAULT_SRID`](crate::DEFAULT_SRID). The coordinates are never transformed, the SRID only
    /// describes them.
    pub fn with_srid(mut self, srid: i32) -> Self {
        self.context.srid = srid;
        self
    }

    /// Sets the precision model the coordinates are snapped to.
    ///
    /// Defaults to [`PrecisionModel::Floating`], which keeps the coordinates unchanged.
    ///
    /// ```
    /// use gml3::{ParserBuilder, PrecisionModel};
    ///
    /// let parser = ParserBuilder::new()
    ///     .with_precision_model(PrecisionModel::Fixed { scale: 1000.0 })
    ///     .build()?;
    ///
    /// let point = parser.parse_str(r#"
    ///     <gml:Point xmlns:gml="http://www.opengis.net/gml/3.2">
    ///         <gml:pos>155000.12345 463000.98765</gml:pos>
    ///     </gml:Point>
    /// "#)?;
    ///
    /// assert_eq!(point.geometry, geo_types::Geometry::Point(geo_types::point!(x: 155000.123, y: 463000.988)));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_precision_model(mut self, precision_model: PrecisionModel) -> Self {
        self.context.precision_model = precision_model;
        self
    }

    /// Sets the minimum number of chords a full circle is approximated with.
    ///
    /// Defaults to [`DEFAULT_MIN_CIRCLE_SEGMENTS`](crate::DEFAULT_MIN_CIRCLE_SEGMENTS). Must be at least 3.
    pub fn with_min_circle_segments(mut self, count: usize) -> Self {
        self.context.min_circle_segments = count;
        self
    }

    /// Sets the maximum number of chords a single arc can be approximated with. Parsing of a geometry with an arc
    /// that requires more chords fails.
    ///
    /// Defaults to [`DEFAULT_MAX_ARC_SEGMENTS`](crate::DEFAULT_MAX_ARC_SEGMENTS).
    pub fn with_max_arc_segments(mut self, count: usize) -> Self {
        self.context.max_arc_segments = count;
        self
    }

    /// Replaces all conversion settings with the given context.
    pub fn with_context(mut self, context: ConversionContext) -> Self {
        self.context = context;
        self
    }

    /// Sets the version of GML documents the parser reads.
    ///
    /// Defaults to [`GmlVersion::V3_2_1`].
    pub fn with_version(mut self, version: GmlVersion) -> Self {
        self.version = version;
        self
    }

    /// Validates the settings and creates the parser.
    pub fn build(self) -> Result<GmlParser, ConfigError> {
        GmlParser::from_parts(self.version, self.context)
    }
}
