//! Fehler-Taxonomie der Anwendung.
//!
//! - `ConfigurationError`: ein einzelner Site-Datensatz ist ungültig (wird übersprungen)
//! - `EngineInitError`: die Karte konnte nicht gemountet werden (an den Aufrufer)
//! - `UploadError`: Bild-Upload abgelehnt oder fehlgeschlagen (Hinweis im UI)
//! - `RaceGuardViolation`: verspäteter Popup-Timer (intern, wird verschluckt)

use crate::core::SiteId;
use crate::engine::EngineError;

/// Ungültiger oder unvollständiger Site-Datensatz.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Datensatz #{index} ist nicht lesbar: {message}")]
    Malformed { index: usize, message: String },
    #[error("Site #{index}: Pflichtfeld '{field}' fehlt oder ist leer")]
    MissingField { index: usize, field: &'static str },
    #[error("Site '{id}': Position ({lng}, {lat}) liegt außerhalb des Kartenbereichs")]
    OutOfBounds { id: SiteId, lng: f64, lat: f64 },
    #[error("Site '{id}' ist doppelt vorhanden, spätere Definition wird ignoriert")]
    DuplicateId { id: SiteId },
}

/// Karte konnte nicht initialisiert werden.
#[derive(Debug, thiserror::Error)]
pub enum EngineInitError {
    #[error("Karten-Engine konnte nicht gemountet werden: {0}")]
    Mount(#[source] EngineError),
    #[error("Karten-Handle ist ungültig (Engine nicht gemountet)")]
    InvalidHandle,
}

/// Fehler des Upload-Kollaborateurs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("Bild ist zu groß ({size} Bytes, erlaubt sind höchstens {limit} Bytes)")]
    TooLarge { size: u64, limit: u64 },
    #[error("Dateityp '{0}' ist kein Bild")]
    UnsupportedMime(String),
    #[error("Dateiinhalt ist kein erkennbares Bildformat")]
    NotAnImage,
    #[error("Dateiinhalt ({detected}) passt nicht zum Dateityp '{declared}'")]
    MimeMismatch {
        declared: String,
        detected: &'static str,
    },
    #[error("Für '{0}' wurde kein Upload angefordert")]
    NotRequested(SiteId),
    #[error("Upload fehlgeschlagen: {0}")]
    Transport(String),
}

/// Ein verzögerter Popup-Attach hat für eine nicht mehr aktive Selektion gefeuert.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Popup-Attach für '{site_id}' (Generation {generation}) ist veraltet")]
pub struct RaceGuardViolation {
    /// Site, für die der Timer geplant wurde
    pub site_id: SiteId,
    /// Selektions-Generation zum Planungszeitpunkt
    pub generation: u64,
}
