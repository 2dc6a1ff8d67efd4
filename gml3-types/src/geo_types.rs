use geo_types::{coord, Coord};

use crate::Coordinate;

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        coord!(x: value.x, y: value.y)
    }
}

impl From<&Coordinate> for Coord<f64> {
    fn from(value: &Coordinate) -> Self {
        coord!(x: value.x, y: value.y)
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(value: Coord<f64>) -> Self {
        Coordinate::new(value.x, value.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_is_dropped() {
        let coord: Coord<f64> = Coordinate::with_z(1.0, 2.0, 3.0).into();
        assert_eq!(coord, coord!(x: 1.0, y: 2.0));
        assert_eq!(Coordinate::from(coord), Coordinate::new(1.0, 2.0));
    }
}
