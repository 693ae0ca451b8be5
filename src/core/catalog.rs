//! Site-Katalog: unveränderliche, geordnete Sammlung aller Sites.

use super::{GeoBounds, Site, SiteCategory, SiteId, SiteRecord};
use crate::errors::ConfigurationError;
use anyhow::{Context, Result};
use indexmap::IndexMap;

/// Geordnete Sammlung validierter Sites (Reihenfolge = Quellreihenfolge).
#[derive(Debug, Clone, Default)]
pub struct SiteCatalog {
    sites: IndexMap<SiteId, Site>,
    rejected: Vec<ConfigurationError>,
}

impl SiteCatalog {
    /// Baut einen Katalog aus Rohdatensätzen.
    ///
    /// Ungültige Datensätze werden protokolliert und übersprungen, sie brechen
    /// den Aufbau des restlichen Katalogs nie ab.
    pub fn from_records(records: Vec<SiteRecord>, bounds: &GeoBounds) -> Self {
        let mut catalog = Self::default();
        for (index, record) in records.into_iter().enumerate() {
            match record.validate(index, bounds) {
                Ok(site) => catalog.push(site),
                Err(err) => catalog.reject(err),
            }
        }
        catalog
    }

    /// Parst ein JSON-Array von Site-Datensätzen.
    ///
    /// Nur ein kaputtes Top-Level-Dokument ist ein Fehler, einzelne
    /// unlesbare Einträge landen in `rejected()`.
    pub fn from_json(json: &str, bounds: &GeoBounds) -> Result<Self> {
        let raw: Vec<serde_json::Value> =
            serde_json::from_str(json).context("Site-Katalog ist kein JSON-Array")?;

        let mut catalog = Self::default();
        for (index, value) in raw.into_iter().enumerate() {
            let validated = serde_json::from_value::<SiteRecord>(value)
                .map_err(|e| ConfigurationError::Malformed {
                    index,
                    message: e.to_string(),
                })
                .and_then(|record| record.validate(index, bounds));
            match validated {
                Ok(site) => catalog.push(site),
                Err(err) => catalog.reject(err),
            }
        }
        Ok(catalog)
    }

    /// Lädt einen Katalog aus einer JSON-Datei.
    pub fn load_from_file(path: &std::path::Path, bounds: &GeoBounds) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Site-Katalog nicht lesbar: {}", path.display()))?;
        let catalog = Self::from_json(&content, bounds)?;
        log::info!(
            "Site-Katalog geladen aus {}: {} Sites, {} verworfen",
            path.display(),
            catalog.len(),
            catalog.rejected.len()
        );
        Ok(catalog)
    }

    /// Eingebauter Katalog mit den İzmir-Kulturorten.
    pub fn builtin() -> Self {
        let bounds = GeoBounds::from_corners(crate::shared::options::MAX_BOUNDS);
        Self::from_records(builtin_records(), &bounds)
    }

    fn push(&mut self, site: Site) {
        if self.sites.contains_key(&site.id) {
            self.reject(ConfigurationError::DuplicateId { id: site.id });
            return;
        }
        self.sites.insert(site.id.clone(), site);
    }

    fn reject(&mut self, err: ConfigurationError) {
        log::warn!("Site übersprungen: {}", err);
        self.rejected.push(err);
    }

    /// Site per ID.
    pub fn get(&self, id: &SiteId) -> Option<&Site> {
        self.sites.get(id)
    }

    /// Alle Sites in Katalog-Reihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    /// Anzahl gültiger Sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Gibt `true` zurück, wenn der Katalog keine Sites enthält.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Beim Aufbau verworfene Datensätze.
    pub fn rejected(&self) -> &[ConfigurationError] {
        &self.rejected
    }
}

fn record(
    id: &str,
    name: &str,
    category: SiteCategory,
    coordinates: [f64; 2],
    description: &str,
    image: &str,
) -> SiteRecord {
    SiteRecord {
        id: id.to_string(),
        name: name.to_string(),
        category,
        coordinates,
        description: description.to_string(),
        image: image.to_string(),
        initial_likes: 0,
    }
}

fn builtin_records() -> Vec<SiteRecord> {
    vec![
        record(
            "kordon",
            "Kordon",
            SiteCategory::Landmark,
            [27.138, 38.4192],
            "Historic waterfront promenade, symbol of İzmir's modern identity",
            "https://images.unsplash.com/photo-1578932750294-f5075e85f44a?w=400&h=300&fit=crop",
        ),
        record(
            "agora",
            "Ancient Agora",
            SiteCategory::Historical,
            [27.14, 38.418],
            "Roman marketplace ruins from 2nd century AD",
            "https://images.unsplash.com/photo-1590073242678-70ee3fc28e8e?w=400&h=300&fit=crop",
        ),
        record(
            "kemeralti",
            "Kemeraltı Bazaar",
            SiteCategory::Shopping,
            [27.128, 38.419],
            "Traditional marketplace dating back to the 17th century",
            "https://images.unsplash.com/photo-1555396273-367ea4eb4db5?w=400&h=300&fit=crop",
        ),
        record(
            "boyoz-cafe",
            "Traditional Boyoz Place",
            SiteCategory::Restaurant,
            [27.142, 38.423],
            "Famous for İzmir's iconic pastry - Boyoz",
            "https://images.unsplash.com/photo-1555507036-ab1f4038808a?w=400&h=300&fit=crop",
        ),
        record(
            "asansor",
            "Historical Elevator",
            SiteCategory::Landmark,
            [27.127, 38.428],
            "Built in 1907, connects lower and upper parts of the city",
            "https://images.unsplash.com/photo-1513407030348-c983a97b98d8?w=400&h=300&fit=crop",
        ),
        record(
            "alsancak",
            "Alsancak Neighborhood",
            SiteCategory::Cafe,
            [27.145, 38.436],
            "Vibrant cultural district with cafes and historic buildings",
            "https://images.unsplash.com/photo-1554118811-1e0d58224f24?w=400&h=300&fit=crop",
        ),
    ]
}
