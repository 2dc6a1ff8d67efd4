//! Parsing of the position carriers: `pos`, `posList` and `coordinates`.

use gml3_types::Coordinate;

use super::element::Element;
use crate::error::DocumentError;

/// Number of values per position when the document does not declare `srsDimension`.
pub(crate) const DEFAULT_DIMENSION: usize = 2;

/// Returns the `srsDimension` declared on the element, or the inherited one.
pub(crate) fn dimension(element: &Element, inherited: usize) -> Result<usize, DocumentError> {
    let Some(value) = element.attribute("srsDimension") else {
        return Ok(inherited);
    };

    match value.trim().parse::<usize>() {
        Ok(dimension @ 2..=3) => Ok(dimension),
        _ => Err(DocumentError::InvalidAttribute {
            name: "srsDimension".into(),
            value: value.into(),
        }),
    }
}

pub(crate) fn parse_number(value: &str) -> Result<f64, DocumentError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| DocumentError::InvalidNumber(value.into()))
}

/// Parses a `pos` element holding exactly one position.
pub(crate) fn parse_pos(element: &Element, inherited: usize) -> Result<Coordinate, DocumentError> {
    let dimension = dimension(element, inherited)?;
    let values = parse_numbers(&element.text)?;
    if values.len() != dimension {
        return Err(invalid(
            element,
            format!(
                "expected {dimension} values per position, found {}",
                values.len()
            ),
        ));
    }

    to_coordinate(element, &values)
}

/// Parses a `posList` element.
pub(crate) fn parse_pos_list(
    element: &Element,
    inherited: usize,
) -> Result<Vec<Coordinate>, DocumentError> {
    let dimension = dimension(element, inherited)?;
    let values = parse_numbers(&element.text)?;
    if values.len() % dimension != 0 {
        return Err(invalid(
            element,
            format!(
                "{} values cannot be split into positions of {dimension} values",
                values.len()
            ),
        ));
    }

    let positions = values
        .chunks(dimension)
        .map(|chunk| to_coordinate(element, chunk))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(count) = element.attribute("count") {
        let expected = count
            .trim()
            .parse::<usize>()
            .map_err(|_| DocumentError::InvalidAttribute {
                name: "count".into(),
                value: count.into(),
            })?;
        if expected != positions.len() {
            return Err(invalid(
                element,
                format!(
                    "declared count is {expected}, but {} positions are given",
                    positions.len()
                ),
            ));
        }
    }

    Ok(positions)
}

/// Parses a `coordinates` element. Separators are taken from the `cs`, `ts` and `decimal` attributes.
///
/// The number of values in each tuple defines the dimension, `srsDimension` is not used.
pub(crate) fn parse_coordinates(element: &Element) -> Result<Vec<Coordinate>, DocumentError> {
    let cs = element.attribute("cs").unwrap_or(",");
    let ts = element.attribute("ts").unwrap_or(" ");
    let decimal = element.attribute("decimal").unwrap_or(".");

    if cs.is_empty() || ts.is_empty() || decimal.is_empty() || cs == ts {
        return Err(invalid(element, "invalid separators".into()));
    }

    let tuples: Vec<&str> = if ts.trim().is_empty() {
        element.text.split_whitespace().collect()
    } else {
        element
            .text
            .split(ts)
            .map(str::trim)
            .filter(|tuple| !tuple.is_empty())
            .collect()
    };

    let mut positions = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        let values = tuple
            .split(cs)
            .map(|value| {
                if decimal == "." {
                    parse_number(value)
                } else {
                    parse_number(&value.replace(decimal, "."))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        positions.push(to_coordinate(element, &values)?);
    }

    Ok(positions)
}

fn parse_numbers(text: &str) -> Result<Vec<f64>, DocumentError> {
    text.split_whitespace().map(parse_number).collect()
}

fn to_coordinate(element: &Element, values: &[f64]) -> Result<Coordinate, DocumentError> {
    Coordinate::try_from(values).map_err(|e| invalid(element, e.to_string()))
}

fn invalid(element: &Element, reason: String) -> DocumentError {
    DocumentError::InvalidCoordinates {
        element: element.name.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn element(name: &str, text: &str, attributes: &[(&str, &str)]) -> Element {
        Element {
            name: name.into(),
            text: text.into(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn pos_with_dimension() {
        let pos = element("pos", " 1.5  2 ", &[]);
        assert_eq!(
            parse_pos(&pos, DEFAULT_DIMENSION),
            Ok(Coordinate::new(1.5, 2.0))
        );
        assert_eq!(parse_pos(&pos, 3).map_err(|_| ()), Err(()));

        let pos = element("pos", "1 2 3", &[("srsDimension", "3")]);
        assert_eq!(
            parse_pos(&pos, DEFAULT_DIMENSION),
            Ok(Coordinate::with_z(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn pos_list() {
        let list = element("posList", "0 0 1 0 1 1", &[]);
        assert_eq!(
            parse_pos_list(&list, DEFAULT_DIMENSION),
            Ok(vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 0.0),
                Coordinate::new(1.0, 1.0),
            ])
        );

        let list = element("posList", "0 0 5 1 0 5", &[("srsDimension", "3"), ("count", "2")]);
        assert_eq!(
            parse_pos_list(&list, DEFAULT_DIMENSION),
            Ok(vec![
                Coordinate::with_z(0.0, 0.0, 5.0),
                Coordinate::with_z(1.0, 0.0, 5.0),
            ])
        );
    }

    #[test]
    fn pos_list_errors() {
        assert_matches!(
            parse_pos_list(&element("posList", "0 0 1", &[]), DEFAULT_DIMENSION),
            Err(DocumentError::InvalidCoordinates { .. })
        );
        assert_matches!(
            parse_pos_list(&element("posList", "0 0 1 1", &[("count", "3")]), 2),
            Err(DocumentError::InvalidCoordinates { .. })
        );
        assert_matches!(
            parse_pos_list(&element("posList", "0 zero", &[]), 2),
            Err(DocumentError::InvalidNumber(v)) if v == "zero"
        );
        assert_matches!(
            parse_pos_list(&element("posList", "0 0", &[("srsDimension", "4")]), 2),
            Err(DocumentError::InvalidAttribute { .. })
        );
    }

    #[test]
    fn coordinates_default_separators() {
        let coordinates = element("coordinates", "0,0 10,0\n 10,10", &[]);
        assert_eq!(
            parse_coordinates(&coordinates),
            Ok(vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(10.0, 0.0),
                Coordinate::new(10.0, 10.0),
            ])
        );
    }

    #[test]
    fn coordinates_custom_separators() {
        let coordinates = element(
            "coordinates",
            "0,5 1,5;2,5 3,5",
            &[("cs", " "), ("ts", ";"), ("decimal", ",")],
        );
        assert_eq!(
            parse_coordinates(&coordinates),
            Ok(vec![Coordinate::new(0.5, 1.5), Coordinate::new(2.5, 3.5)])
        );
    }

    #[test]
    fn coordinates_errors() {
        assert_matches!(
            parse_coordinates(&element("coordinates", "1,2,3,4", &[])),
            Err(DocumentError::InvalidCoordinates { .. })
        );
        assert_matches!(
            parse_coordinates(&element("coordinates", "1 2", &[("cs", " ")])),
            Err(DocumentError::InvalidCoordinates { .. })
        );
    }
}
