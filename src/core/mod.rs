//! Core-Domänentypen: Sites, Katalog, Geo-Koordinaten, Kamera-Ziele, Likes.

pub mod camera;
pub mod catalog;
pub mod geo;
pub mod like;
/// Site-Datenmodell
///
/// - `Site`: validierter, unveränderlicher Point of Interest
/// - `SiteRecord`: Rohdatensatz aus JSON/Built-in
/// - `SiteCategory`: Kategorie mit Fallback für unbekannte Werte
pub mod site;

pub use camera::{CameraTarget, CameraView, Easing};
pub use catalog::SiteCatalog;
pub use geo::{GeoBounds, LngLat};
pub use like::LikeState;
pub use site::{Site, SiteCategory, SiteId, SiteRecord};
