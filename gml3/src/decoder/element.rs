//! Namespace-resolved element tree of an XML document.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use crate::error::DocumentError;

/// Maximum nesting depth of elements in a document.
pub(crate) const MAX_DEPTH: usize = 256;

/// XML element with resolved namespace and everything it contains.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Element {
    pub namespace: Option<String>,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Value of the attribute with the given local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn from_start(namespace: Option<String>, start: &BytesStart) -> Result<Self, DocumentError> {
        let name = utf8(start.local_name().as_ref())?.to_owned();

        let mut attributes = vec![];
        for attribute in start.attributes() {
            let attribute = attribute?;
            if attribute.key.as_namespace_binding().is_some() {
                continue;
            }

            let key = utf8(attribute.key.local_name().as_ref())?.to_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            namespace,
            name,
            attributes,
            text: String::new(),
            children: vec![],
        })
    }
}

/// Reads the whole document from the source and returns its root element.
///
/// Documents with elements nested deeper than [`MAX_DEPTH`] are rejected as soon as the limit is crossed.
pub(crate) fn read_document<R: BufRead>(source: R) -> Result<Element, DocumentError> {
    let mut reader = NsReader::from_reader(source);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = vec![];
    let mut root = None;

    loop {
        buf.clear();
        let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
        let namespace = resolve_namespace(resolved)?;

        match event {
            Event::Start(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(DocumentError::TooDeep(MAX_DEPTH));
                }
                stack.push(Element::from_start(namespace, &start)?);
            }
            Event::Empty(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(DocumentError::TooDeep(MAX_DEPTH));
                }
                let element = Element::from_start(namespace, &start)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::End(end) => {
                let Some(element) = stack.pop() else {
                    return Err(DocumentError::Xml(format!(
                        "unexpected closing tag '{}'",
                        String::from_utf8_lossy(end.name().as_ref())
                    )));
                };
                close_element(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                append_text(&text.unescape()?, &mut stack)?;
            }
            Event::CData(data) => {
                append_text(utf8(&data)?, &mut stack)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DocumentError::Xml(format!(
            "unexpected end of document, element '{}' is not closed",
            open.name
        )));
    }

    root.ok_or(DocumentError::Empty)
}

fn resolve_namespace(resolved: ResolveResult) -> Result<Option<String>, DocumentError> {
    match resolved {
        ResolveResult::Bound(Namespace(ns)) => Ok(Some(utf8(ns)?.to_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(DocumentError::Xml(format!(
            "namespace prefix '{}' is not declared",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn close_element(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(DocumentError::MultipleRoots),
        None => *root = Some(element),
    }

    Ok(())
}

fn append_text(text: &str, stack: &mut [Element]) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(element) => element.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(DocumentError::Xml(
                "text content outside of the root element".into(),
            ))
        }
    }

    Ok(())
}

fn utf8(bytes: &[u8]) -> Result<&str, DocumentError> {
    std::str::from_utf8(bytes).map_err(|e| DocumentError::Xml(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const GML: &str = "http://www.opengis.net/gml/3.2";

    #[test]
    fn reads_namespaces_and_attributes() {
        let document = r#"<?xml version="1.0" encoding="UTF-8"?>
            <gml:Point xmlns:gml="http://www.opengis.net/gml/3.2" gml:id="p1" srsName="EPSG:28992">
                <gml:pos srsDimension="2">1 2</gml:pos>
            </gml:Point>"#;

        let root = read_document(document.as_bytes()).unwrap();
        assert_eq!(root.namespace.as_deref(), Some(GML));
        assert_eq!(root.name, "Point");
        assert_eq!(root.attribute("id"), Some("p1"));
        assert_eq!(root.attribute("srsName"), Some("EPSG:28992"));
        assert_eq!(root.attribute("gml"), None);

        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "pos");
        assert_eq!(root.children[0].text, "1 2");
        assert_eq!(root.children[0].attribute("srsDimension"), Some("2"));
    }

    #[test]
    fn default_namespace() {
        let root = read_document(
            r#"<Point xmlns="http://www.opengis.net/gml/3.2"><pos>1 2</pos></Point>"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(root.children[0].namespace.as_deref(), Some(GML));
    }

    #[test]
    fn unescapes_text() {
        let root = read_document("<a>1 &amp; 2<![CDATA[ <3>]]></a>".as_bytes()).unwrap();
        assert_eq!(root.text, "1 & 2 <3>");
    }

    #[test]
    fn document_errors() {
        assert_matches!(read_document("".as_bytes()), Err(DocumentError::Empty));
        assert_matches!(
            read_document("<?xml version=\"1.0\"?>\n".as_bytes()),
            Err(DocumentError::Empty)
        );
        assert_matches!(
            read_document("<a/><b/>".as_bytes()),
            Err(DocumentError::MultipleRoots)
        );
        assert_matches!(
            read_document("<a><b></a>".as_bytes()),
            Err(DocumentError::Xml(_))
        );
        assert_matches!(
            read_document("<a><b></b>".as_bytes()),
            Err(DocumentError::Xml(_))
        );
        assert_matches!(
            read_document("not xml at all".as_bytes()),
            Err(DocumentError::Xml(_))
        );
        assert_matches!(
            read_document("<gml:Point/>".as_bytes()),
            Err(DocumentError::Xml(_))
        );
    }

    #[test]
    fn nesting_depth_is_limited() {
        let nested = |depth: usize| format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));

        assert!(read_document(nested(MAX_DEPTH).as_bytes()).is_ok());
        assert_matches!(
            read_document(nested(MAX_DEPTH + 1).as_bytes()),
            Err(DocumentError::TooDeep(MAX_DEPTH))
        );
        assert_matches!(
            read_document(nested(200_000).as_bytes()),
            Err(DocumentError::TooDeep(MAX_DEPTH))
        );

        let empty_at_limit = format!(
            "{}<b/>{}",
            "<a>".repeat(MAX_DEPTH),
            "</a>".repeat(MAX_DEPTH)
        );
        assert_matches!(
            read_document(empty_at_limit.as_bytes()),
            Err(DocumentError::TooDeep(MAX_DEPTH))
        );
    }
}
