use std::fmt::{Display, Formatter};
use std::io::BufRead;
use std::sync::Arc;

use crate::builder::ParserBuilder;
use crate::context::ConversionContext;
use crate::convert::Converter;
use crate::decoder::{self, GmlVersion, Vocabulary};
use crate::error::{ConfigError, ParseError};
use crate::planar::PlanarGeometry;

/// Parser of GML 3 geometry documents.
///
/// A parser is created once with a fixed configuration and then can be used to parse any number of documents. It
/// does not keep any state between the calls, so it can be cloned cheaply and shared between threads.
///
/// ```
/// use geo_types::Geometry;
/// use gml3::GmlParser;
///
/// let parser = GmlParser::new(0.01, 28992)?;
/// let result = parser.parse_str(r#"
///     <gml:Curve xmlns:gml="http://www.opengis.net/gml/3.2">
///         <gml:segments>
///             <gml:Arc>
///                 <gml:posList>1 0 0.70710678 0.70710678 0 1</gml:posList>
///             </gml:Arc>
///         </gml:segments>
///     </gml:Curve>
/// "#)?;
///
/// assert_eq!(result.srid, 28992);
/// assert!(matches!(result.geometry, Geometry::LineString(_)));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct GmlParser {
    vocabulary: Arc<Vocabulary>,
    context: Arc<ConversionContext>,
}

impl GmlParser {
    /// Creates a GML 3.2.1 parser with the given maximum arc approximation error and SRID.
    ///
    /// Use [`GmlParser::builder`] to change other settings.
    pub fn new(max_arc_approximation_error: f64, srid: i32) -> Result<Self, ConfigError> {
        ParserBuilder::new()
            .with_max_arc_approximation_error(max_arc_approximation_error)
            .with_srid(srid)
            .build()
    }

    /// Creates a GML 3.2.1 parser with default settings.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        ParserBuilder::new().build()
    }

    /// Returns a builder to configure a parser.
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    pub(crate) fn from_parts(
        version: GmlVersion,
        context: ConversionContext,
    ) -> Result<Self, ConfigError> {
        context.validate()?;
        let vocabulary = Vocabulary::new(version)?;

        log::info!(
            "Created {} parser with SRID {} and maximum arc approximation error {}",
            version,
            context.srid,
            context.max_arc_approximation_error
        );

        Ok(Self {
            vocabulary: Arc::new(vocabulary),
            context: Arc::new(context),
        })
    }

    /// Parses a document read from the source.
    ///
    /// The source must contain exactly one geometry element at the root. Arcs are approximated by straight
    /// segments, coordinates are snapped to the precision model, and the result is checked for validity.
    pub fn parse_reader<R: BufRead>(&self, source: R) -> Result<PlanarGeometry, ParseError> {
        let result = decoder::decode(source, &self.vocabulary)
            .map_err(ParseError::from)
            .and_then(|geometry| Converter::new(&self.context).convert(&geometry));

        if let Err(error) = &result {
            log::debug!("{} rejected document: {error}", self.identify());
        }

        result
    }

    /// Parses a document given as a string.
    ///
    /// Returns [`ParseError::EmptyInput`] if the string is empty or contains only whitespace.
    ///
    /// ```
    /// use gml3::{GmlParser, ParseError};
    ///
    /// let parser = GmlParser::with_defaults()?;
    /// assert!(matches!(parser.parse_str("  \n"), Err(ParseError::EmptyInput)));
    /// # Ok::<(), gml3::ConfigError>(())
    /// ```
    pub fn parse_str(&self, document: &str) -> Result<PlanarGeometry, ParseError> {
        if document.trim().is_empty() {
            log::debug!("{} rejected empty document", self.identify());
            return Err(ParseError::EmptyInput);
        }

        self.parse_reader(document.as_bytes())
    }

    /// Name of the parser, depending on the GML version it reads.
    pub fn identify(&self) -> &'static str {
        self.version().parser_name()
    }

    /// GML version of the documents the parser reads.
    pub fn version(&self) -> GmlVersion {
        self.vocabulary.version()
    }

    /// Conversion settings of the parser.
    pub fn context(&self) -> &ConversionContext {
        &self.context
    }
}

impl Display for GmlParser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identify())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use geo_types::{point, Geometry};

    use super::*;
    use crate::error::{DocumentError, ErrorTier};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn parser_is_send_and_sync() {
        assert_send_sync::<GmlParser>();
    }

    #[test]
    fn identify() {
        let parser = GmlParser::with_defaults().unwrap();
        assert_eq!(parser.identify(), "GML3_2_1_Parser");
        assert_eq!(parser.to_string(), "GML3_2_1_Parser");

        let parser = GmlParser::builder()
            .with_version(GmlVersion::V3_1_1)
            .build()
            .unwrap();
        assert_eq!(parser.identify(), "GML3_1_1_Parser");
    }

    #[test]
    fn new_validates_tolerance() {
        assert_matches!(
            GmlParser::new(0.0, 28992),
            Err(ConfigError::InvalidTolerance(_))
        );
        let parser = GmlParser::new(0.5, 4326).unwrap();
        assert_eq!(parser.context().srid, 4326);
        assert_eq!(parser.context().max_arc_approximation_error, 0.5);
    }

    #[test]
    fn parse_point() {
        let parser = GmlParser::with_defaults().unwrap();
        let result = parser
            .parse_str(
                r#"<gml:Point xmlns:gml="http://www.opengis.net/gml/3.2" gml:id="p1" srsName="EPSG:28992">
                    <gml:pos>155000 463000</gml:pos>
                </gml:Point>"#,
            )
            .unwrap();

        assert_eq!(result.srid, 28992);
        assert_eq!(
            result.geometry,
            Geometry::Point(point!(x: 155000.0, y: 463000.0))
        );
    }

    #[test]
    fn errors_keep_their_tier() {
        let parser = GmlParser::with_defaults().unwrap();

        let error = parser.parse_str("<gml:Point").unwrap_err();
        assert_eq!(error.tier(), ErrorTier::Document);

        let error = parser.parse_str("<a/>").unwrap_err();
        assert_matches!(
            error,
            ParseError::Document(DocumentError::UnexpectedRoot(ref name)) if name == "a"
        );

        let error = parser
            .parse_str(
                r#"<gml:LinearRing xmlns:gml="http://www.opengis.net/gml/3.2">
                    <gml:posList>0 0 1 0 1 1 0 1</gml:posList>
                </gml:LinearRing>"#,
            )
            .unwrap_err();
        assert_eq!(error.tier(), ErrorTier::Geometry);
    }

    #[test]
    fn clones_share_configuration() {
        let parser = GmlParser::new(0.1, 4326).unwrap();
        let clone = parser.clone();
        assert!(Arc::ptr_eq(&parser.context, &clone.context));
        assert!(Arc::ptr_eq(&parser.vocabulary, &clone.vocabulary));
    }
}
