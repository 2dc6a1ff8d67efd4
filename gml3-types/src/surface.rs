use serde::{Deserialize, Serialize};

use crate::curve::Ring;

/// Planar area bounded by one exterior ring, with zero or more holes.
///
/// Holes are expected to lie inside the exterior ring without touching or crossing it. This is not enforced by the
/// type, but is checked when the surface is converted into a polygon.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Surface {
    /// Outer boundary.
    pub exterior: Ring,
    /// Boundaries of the holes.
    pub interiors: Vec<Ring>,
}

impl Surface {
    /// Creates a new surface.
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Iterates over all rings of the surface starting with the exterior one.
    pub fn iter_rings(&self) -> impl Iterator<Item = &'_ Ring> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }
}

impl From<Ring> for Surface {
    fn from(exterior: Ring) -> Self {
        Self {
            exterior,
            interiors: vec![],
        }
    }
}
