//! Karten-Engine-Grenze.
//!
//! `MapEngine` beschreibt die konsumierte Schnittstelle der externen
//! Karten-Engine (Mount, Marker/Popups, Kamera, Events). `MapAdapter` ist die
//! dünne Fassade, über die die Anwendung mit der Engine spricht;
//! `HeadlessEngine` ist eine In-Memory-Engine mit virtueller Uhr.

pub mod adapter;
pub mod headless;

use crate::core::{CameraTarget, CameraView, GeoBounds, LngLat, SiteId};
use crate::overlay::{NodeAction, VisualNode};
use std::time::Duration;

pub use adapter::{LayerFilter, MapAdapter};
pub use headless::{EngineOp, HeadlessEngine};

macro_rules! engine_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);
    };
}

engine_id!(
    /// Handle eines an die Karte gehängten Markers.
    MarkerId
);
engine_id!(
    /// Handle eines angehängten Popups.
    PopupId
);
engine_id!(
    /// Handle eines Control-Panels (Legende, Badge, Navigation).
    ControlId
);
engine_id!(
    /// Handle eines registrierten Karten-Klick-Listeners.
    ListenerId
);
engine_id!(
    /// Element innerhalb eines angehängten Knotenbaums.
    ElementId
);

/// Fehler an der Engine-Grenze.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Mount fehlgeschlagen: {0}")]
    Mount(String),
    #[error("Engine ist nicht gemountet")]
    NotMounted,
    #[error("Layer '{0}' existiert nicht")]
    UnknownLayer(String),
}

/// Parameter für das Mounten der Karte.
#[derive(Debug, Clone, PartialEq)]
pub struct MountConfig {
    pub style_url: String,
    pub center: LngLat,
    pub zoom: f64,
    /// Kamera kann diesen Bereich nicht verlassen
    pub max_bounds: GeoBounds,
    /// Zoom-Buttons (ohne Kompass) unten links
    pub navigation_control: bool,
}

/// Art eines Style-Layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Background,
    Fill,
    Line,
    Symbol,
    Raster,
}

/// Style-Layer der Engine.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleLayer {
    pub id: String,
    pub kind: LayerKind,
    pub visible: bool,
}

impl StyleLayer {
    pub fn new(id: &str, kind: LayerKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            visible: true,
        }
    }
}

/// Popup-Optionen (Offset, kein eingebauter Schließen-Button).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupOptions {
    pub offset_px: f32,
    pub max_width_px: f32,
    pub close_button: bool,
    pub close_on_click: bool,
}

/// Ecke eines Control-Panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Auftrag eines verzögerten Timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerToken {
    /// Popup der Site anhängen, sofern die Generation noch aktuell ist
    AttachPopup { site_id: SiteId, generation: u64 },
}

/// Karten-Klick mit Original-Target für den Hit-Test.
#[derive(Debug, Clone, PartialEq)]
pub struct MapClick {
    /// Listener, an den das Event geliefert wird
    pub listener: ListenerId,
    /// Geklicktes Element (`None` = freie Kartenfläche)
    pub target: Option<ElementId>,
    pub position: LngLat,
}

/// Events der Engine an die Anwendung.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Style vollständig geladen (Karte bereit)
    StyleLoaded,
    /// Klick-Aktion eines Overlay-Elements
    ElementAction(NodeAction),
    /// Zeiger betritt/verlässt ein Element mit Aktion
    Hover { action: NodeAction, entered: bool },
    /// Klick auf die Karte an einen registrierten Listener
    MapClick(MapClick),
    /// Verzögerter Timer ist abgelaufen
    TimerElapsed(TimerToken),
}

/// Konsumierte Schnittstelle der externen Karten-Engine.
pub trait MapEngine {
    fn mount(&mut self, config: &MountConfig) -> Result<(), EngineError>;
    /// Gibt alle Ressourcen frei; auch nach fehlgeschlagenem Mount sicher.
    fn unmount(&mut self);
    fn is_mounted(&self) -> bool;

    fn style_layers(&self) -> Vec<StyleLayer>;
    fn set_layer_visible(&mut self, layer_id: &str, visible: bool) -> Result<(), EngineError>;
    fn has_stylesheet(&self, id: &str) -> bool;
    fn register_stylesheet(&mut self, id: &str, css: &str);

    /// Startet eine Kamerafahrt; eine laufende Fahrt wird überschrieben.
    fn ease_to(&mut self, target: &CameraTarget);
    fn camera(&self) -> CameraView;

    fn add_marker(&mut self, element: VisualNode, position: LngLat) -> Result<MarkerId, EngineError>;
    fn remove_marker(&mut self, id: MarkerId);
    fn set_marker_class(&mut self, id: MarkerId, class: &str, enabled: bool);

    fn add_popup(
        &mut self,
        content: VisualNode,
        position: LngLat,
        options: &PopupOptions,
    ) -> Result<PopupId, EngineError>;
    fn set_popup_content(&mut self, id: PopupId, content: VisualNode);
    fn remove_popup(&mut self, id: PopupId);

    fn add_control(
        &mut self,
        element: VisualNode,
        corner: ControlCorner,
    ) -> Result<ControlId, EngineError>;
    fn remove_control(&mut self, id: ControlId);

    fn on_click(&mut self) -> ListenerId;
    fn off_click(&mut self, id: ListenerId);

    /// Plant einen Timer, der als `EngineEvent::TimerElapsed` zurückkommt.
    fn set_timeout(&mut self, delay: Duration, token: TimerToken);

    /// Nächster Vorfahre (inkl. `target`) mit der Klasse.
    fn closest(&self, target: ElementId, class: &str) -> Option<ElementId>;

    /// Entnimmt alle aufgelaufenen Events.
    fn poll_events(&mut self) -> Vec<EngineEvent>;
}
