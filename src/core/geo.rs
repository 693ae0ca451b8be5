//! Geografische Grundtypen: Längen-/Breitengrad-Punkte und Bounding-Box.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Geo-Position als `(longitude, latitude)` in Grad.
pub type LngLat = DVec2;

/// Achsenparallele geografische Bounding-Box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Südwest-Ecke (min. Längengrad, min. Breitengrad)
    pub south_west: LngLat,
    /// Nordost-Ecke (max. Längengrad, max. Breitengrad)
    pub north_east: LngLat,
}

impl GeoBounds {
    /// Erstellt eine Bounding-Box aus zwei beliebigen Ecken.
    pub fn new(a: LngLat, b: LngLat) -> Self {
        Self {
            south_west: a.min(b),
            north_east: a.max(b),
        }
    }

    /// Erstellt eine Bounding-Box aus dem Config-Format `[[lng, lat], [lng, lat]]`.
    pub fn from_corners(corners: [[f64; 2]; 2]) -> Self {
        Self::new(DVec2::from(corners[0]), DVec2::from(corners[1]))
    }

    /// Prüft, ob ein Punkt innerhalb der Box liegt (Ränder inklusive).
    pub fn contains(&self, point: LngLat) -> bool {
        point.is_finite()
            && point.cmpge(self.south_west).all()
            && point.cmple(self.north_east).all()
    }

    /// Klemmt einen Punkt in die Box.
    pub fn clamp(&self, point: LngLat) -> LngLat {
        point.clamp(self.south_west, self.north_east)
    }

    /// Mittelpunkt der Box.
    pub fn center(&self) -> LngLat {
        (self.south_west + self.north_east) * 0.5
    }
}
