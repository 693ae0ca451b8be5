use crate::app::CommandLog;
use crate::core::{Site, SiteCatalog, SiteId};
use crate::engine::{ListenerId, PopupOptions};
use crate::shared::MapOptions;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

use super::{
    ChromeState, MapLifecycle, OverlayHandle, PopupState, SelectionState, UiState, VisualState,
};

/// Hauptzustand der Anwendung (eine Karteninstanz)
pub struct AppState {
    /// Unveränderlicher Site-Katalog
    pub catalog: Arc<SiteCatalog>,
    /// Laufzeit-Optionen (Kamera, Popup, Layer, Upload)
    pub options: MapOptions,
    /// Lebenszyklus der Karte
    pub lifecycle: MapLifecycle,
    /// Selection-State
    pub selection: SelectionState,
    /// Overlay-Arena, ein Handle pro Site (Katalog-Reihenfolge)
    pub overlays: IndexMap<SiteId, OverlayHandle>,
    /// Popup-Slot der aktiven Selektion
    pub popup: PopupState,
    /// Aktuell registrierter Dismiss-Listener
    pub dismiss_listener: Option<ListenerId>,
    /// Legende und Site-Badge
    pub chrome: ChromeState,
    /// UI-State
    pub ui: UiState,
    /// Hochgeladene Bilder ersetzen die Katalog-Bilder für die Sitzung
    pub image_overrides: HashMap<SiteId, String>,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
}

impl AppState {
    /// Erstellt einen App-State mit dem eingebauten Katalog und Standard-Optionen
    pub fn new() -> Self {
        Self::with_catalog(SiteCatalog::builtin(), MapOptions::default())
    }

    pub fn with_catalog(catalog: SiteCatalog, options: MapOptions) -> Self {
        Self {
            catalog: Arc::new(catalog),
            options,
            lifecycle: MapLifecycle::Unmounted,
            selection: SelectionState::new(),
            overlays: IndexMap::new(),
            popup: PopupState::Empty,
            dismiss_listener: None,
            chrome: ChromeState::default(),
            ui: UiState::new(),
            image_overrides: HashMap::new(),
            command_log: CommandLog::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle == MapLifecycle::Ready
    }

    pub fn site(&self, site_id: &SiteId) -> Option<&Site> {
        self.catalog.get(site_id)
    }

    /// Aktuell aktive Site.
    pub fn active_site(&self) -> Option<&Site> {
        self.selection
            .active_site_id
            .as_ref()
            .and_then(|id| self.catalog.get(id))
    }

    /// Angezeigtes Bild einer Site (Upload-Ersatz oder Katalog-URL).
    pub fn image_url_for(&self, site: &Site) -> String {
        self.image_overrides
            .get(&site.id)
            .cloned()
            .unwrap_or_else(|| site.image_url.clone())
    }

    /// Popup-Optionen aus der Konfiguration (ohne eingebauten Schließen-Button).
    pub fn popup_options(&self) -> PopupOptions {
        PopupOptions {
            offset_px: self.options.popup_offset_px,
            max_width_px: self.options.popup_max_width_px,
            close_button: false,
            close_on_click: false,
        }
    }

    /// Anzahl Handles im Zustand `Active` (höchstens eins).
    pub fn active_handle_count(&self) -> usize {
        self.overlays
            .values()
            .filter(|h| h.visual_state == VisualState::Active)
            .count()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
