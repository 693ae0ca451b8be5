//! Zentrale Konfiguration der Kulturkarte.
//!
//! `MapOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::{CameraTarget, Easing, GeoBounds, LngLat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ── Kamera ──────────────────────────────────────────────────────────

/// Stadtweite Standardansicht (Längengrad, Breitengrad).
pub const DEFAULT_CENTER: [f64; 2] = [27.135, 38.423];
/// Zoom der Standardansicht.
pub const DEFAULT_ZOOM: f64 = 11.0;
/// Nah-Zoom auf eine aktive Site.
pub const ACTIVE_ZOOM: f64 = 15.0;
/// Dauer jeder Kamerafahrt in Millisekunden.
pub const CAMERA_DURATION_MS: u64 = 1200;
/// Erlaubter Kartenbereich `[[lng, lat] SW, [lng, lat] NO]`.
pub const MAX_BOUNDS: [[f64; 2]; 2] = [[26.8, 38.1], [27.4, 38.6]];

// ── Popup ───────────────────────────────────────────────────────────

/// Verzögerung zwischen Kamerastart und Popup-Attach.
pub const POPUP_ATTACH_DELAY_MS: u64 = 100;
/// Abstand Popup-Spitze zum Marker in Pixeln.
pub const POPUP_OFFSET_PX: f32 = 30.0;
/// Maximale Popup-Breite in Pixeln.
pub const POPUP_MAX_WIDTH_PX: f32 = 360.0;

// ── Karten-Style ────────────────────────────────────────────────────

/// Style-URL der Karten-Engine.
pub const STYLE_URL: &str = "https://api.maptiler.com/maps/streets-v4/style.json";
/// Layer-IDs, die auf dieses Muster passen, werden ausgeblendet.
pub const HIDDEN_LAYER_PATTERN: &str = "(?i)poi";

// ── Upload ──────────────────────────────────────────────────────────

/// Maximale Bildgröße für Uploads (5 MiB).
pub const UPLOAD_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Alle zur Laufzeit änderbaren Karten-Optionen.
/// Wird als `cultural_site_map.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapOptions {
    // ── Kamera ──────────────────────────────────────────────────
    /// Mittelpunkt der Standardansicht
    pub default_center: [f64; 2],
    /// Zoom der Standardansicht
    pub default_zoom: f64,
    /// Zoom beim Fokus auf eine Site
    pub active_zoom: f64,
    /// Dauer einer Kamerafahrt (ms)
    pub camera_duration_ms: u64,
    /// Erlaubter Kartenbereich
    pub max_bounds: [[f64; 2]; 2],

    // ── Popup ───────────────────────────────────────────────────
    /// Verzögerung des Popup-Attach nach Kamerastart (ms, 0 = sofort)
    pub popup_attach_delay_ms: u64,
    /// Abstand Popup zu Marker (px)
    pub popup_offset_px: f32,
    /// Maximale Popup-Breite (px)
    pub popup_max_width_px: f32,
    /// Ortsangabe in der Popup-Fußzeile
    pub location_label: String,

    // ── Style ───────────────────────────────────────────────────
    /// Style-URL der Engine
    pub style_url: String,
    /// Regex für auszublendende Default-Layer (nach Layer-ID)
    pub hidden_layer_pattern: String,
    /// Symbol-Layer (Labels) grundsätzlich ausblenden
    pub hide_symbol_layers: bool,
    /// Zoom-Buttons unten links anzeigen
    pub show_navigation_control: bool,

    // ── Upload ──────────────────────────────────────────────────
    /// Maximale Upload-Größe in Bytes
    pub upload_max_bytes: u64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            active_zoom: ACTIVE_ZOOM,
            camera_duration_ms: CAMERA_DURATION_MS,
            max_bounds: MAX_BOUNDS,

            popup_attach_delay_ms: POPUP_ATTACH_DELAY_MS,
            popup_offset_px: POPUP_OFFSET_PX,
            popup_max_width_px: POPUP_MAX_WIDTH_PX,
            location_label: "İzmir, Turkey".to_string(),

            style_url: STYLE_URL.to_string(),
            hidden_layer_pattern: HIDDEN_LAYER_PATTERN.to_string(),
            hide_symbol_layers: true,
            show_navigation_control: true,

            upload_max_bytes: UPLOAD_MAX_BYTES,
        }
    }
}

impl MapOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("cultural_site_map"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("cultural_site_map.toml")
    }

    /// Erlaubter Kartenbereich als `GeoBounds`.
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::from_corners(self.max_bounds)
    }

    /// Dauer einer Kamerafahrt.
    pub fn camera_duration(&self) -> Duration {
        Duration::from_millis(self.camera_duration_ms)
    }

    /// Verzögerung des Popup-Attach.
    pub fn popup_attach_delay(&self) -> Duration {
        Duration::from_millis(self.popup_attach_delay_ms)
    }

    /// Kameraziel der stadtweiten Standardansicht.
    pub fn default_view(&self) -> CameraTarget {
        CameraTarget {
            center: LngLat::from(self.default_center),
            zoom: self.default_zoom,
            duration: self.camera_duration(),
            easing: Easing::EaseOutQuad,
        }
    }

    /// Kameraziel für den Fokus auf eine Site-Position.
    pub fn close_up(&self, position: LngLat) -> CameraTarget {
        CameraTarget {
            center: position,
            zoom: self.active_zoom,
            duration: self.camera_duration(),
            easing: Easing::EaseOutQuad,
        }
    }
}
