use crate::core::SiteId;
use crate::engine::ElementId;
use crate::errors::UploadError;
use crate::upload::ImageBlob;

/// Mutierende Commands, die vom Controller ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    // === Lebenszyklus ===
    /// Karte mounten (Unmounted → Mounting)
    MountMap,
    /// Default-POI-/Label-Layer ausblenden (idempotent)
    HideDefaultLayers,
    /// Overlay-Handles und Chrome aufbauen (Mounting → Ready)
    InitializeOverlays,
    /// Overlays, Listener und Karte abbauen
    Teardown,

    // === Selektion ===
    /// Site aktivieren bzw. deaktivieren, wenn sie bereits aktiv ist
    ToggleSelection { site_id: SiteId },
    /// Selektion aufheben
    ClearSelection,
    /// Transienten Hover-Zustand eines Markers setzen
    SetMarkerHover { site_id: SiteId, hovered: bool },
    /// Hintergrund-Klick: Selektion aufheben, falls außerhalb jedes Markers
    DismissOnBackgroundClick { target: Option<ElementId> },

    // === Popup ===
    /// Verzögertes Popup anhängen (mit Race-Guard)
    AttachScheduledPopup { site_id: SiteId, generation: u64 },
    /// Like im angehängten Popup umschalten
    ToggleLike { site_id: SiteId },

    // === Upload ===
    /// Dateiauswahl für eine Site öffnen
    OpenUploadPicker { site_id: SiteId },
    /// Gewähltes Bild prüfen und für den Transport bereitstellen
    PrepareUpload { site_id: SiteId, blob: ImageBlob },
    /// Transport-Ergebnis übernehmen
    ApplyUploadResult {
        site_id: SiteId,
        result: Result<String, UploadError>,
    },
    /// Dateiauswahl schließen
    CloseUploadPicker,
    /// Hinweis-Meldung entfernen
    DismissNotice,
}
