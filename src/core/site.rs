//! Site-Datensätze: Points of Interest mit fester Position und Kategorie.

use super::{GeoBounds, LngLat};
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Eindeutige Kennung einer Site (z.B. `"kordon"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(String);

impl SiteId {
    /// Erstellt eine Site-ID aus einem beliebigen String.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// String-Sicht auf die ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Kategorie einer Site. Bestimmt Farbe und Icon des Markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteCategory {
    Restaurant,
    Cafe,
    Landmark,
    Historical,
    Shopping,
    Photo,
    /// Unbekannte Kategorie aus externen Daten (Fallback-Icon und -Farbe)
    #[serde(other)]
    Unknown,
}

impl SiteCategory {
    /// Alle bekannten Kategorien in Legenden-Reihenfolge.
    pub const ALL: [SiteCategory; 6] = [
        SiteCategory::Restaurant,
        SiteCategory::Cafe,
        SiteCategory::Landmark,
        SiteCategory::Historical,
        SiteCategory::Shopping,
        SiteCategory::Photo,
    ];

    /// Kleingeschriebener Schlüssel (wie im Datensatz).
    pub fn key(self) -> &'static str {
        match self {
            SiteCategory::Restaurant => "restaurant",
            SiteCategory::Cafe => "cafe",
            SiteCategory::Landmark => "landmark",
            SiteCategory::Historical => "historical",
            SiteCategory::Shopping => "shopping",
            SiteCategory::Photo => "photo",
            SiteCategory::Unknown => "unknown",
        }
    }

    /// Anzeigename mit großem Anfangsbuchstaben.
    pub fn label(self) -> String {
        let key = self.key();
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Unveränderlicher, validierter Site-Datensatz.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    pub category: SiteCategory,
    /// Position als (Längengrad, Breitengrad)
    pub position: LngLat,
    pub description: String,
    pub image_url: String,
    /// Startwert des Like-Zählers
    pub like_seed: u32,
}

/// Rohdatensatz im JSON-Format der Site-Konfiguration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub category: SiteCategory,
    /// `[lng, lat]`
    pub coordinates: [f64; 2],
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, rename = "initialLikes")]
    pub initial_likes: u32,
}

impl SiteRecord {
    /// Validiert den Datensatz gegen den Kartenbereich.
    ///
    /// `index` ist die Position im Quell-Array und dient nur der Fehlermeldung.
    pub fn validate(self, index: usize, bounds: &GeoBounds) -> Result<Site, ConfigurationError> {
        if self.id.trim().is_empty() {
            return Err(ConfigurationError::MissingField { index, field: "id" });
        }
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::MissingField {
                index,
                field: "name",
            });
        }

        let position = LngLat::from(self.coordinates);
        let id = SiteId::new(self.id);
        if !bounds.contains(position) {
            return Err(ConfigurationError::OutOfBounds {
                id,
                lng: position.x,
                lat: position.y,
            });
        }

        Ok(Site {
            id,
            name: self.name,
            category: self.category,
            position,
            description: self.description,
            image_url: self.image,
            like_seed: self.initial_likes,
        })
    }
}

impl Site {
    /// Prüft, ob die Site im gegebenen Kartenbereich liegt.
    pub fn check_bounds(&self, bounds: &GeoBounds) -> Result<(), ConfigurationError> {
        if bounds.contains(self.position) {
            Ok(())
        } else {
            Err(ConfigurationError::OutOfBounds {
                id: self.id.clone(),
                lng: self.position.x,
                lat: self.position.y,
            })
        }
    }
}
