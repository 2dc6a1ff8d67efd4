//! Structural deserialization of GML documents into the geometry tree.
//!
//! Decoding is done in two passes. First the document is read into a tree of elements with resolved namespaces,
//! then the tree is matched against the [vocabulary](GmlVersion) of the parser and turned into a
//! [`GmlGeometry`]. Any failure on this level is a [`DocumentError`].

use std::io::BufRead;

use gml3_types::GmlGeometry;

use crate::error::DocumentError;

mod element;
mod geometry;
mod positions;
mod vocabulary;

pub use vocabulary::GmlVersion;
pub(crate) use vocabulary::Vocabulary;

/// Reads a complete document from the source and decodes the geometry it describes.
pub(crate) fn decode<R: BufRead>(
    source: R,
    vocabulary: &Vocabulary,
) -> Result<GmlGeometry, DocumentError> {
    let root = element::read_document(source)?;
    geometry::TreeDecoder::new(vocabulary).decode(&root)
}
