use crate::core::{LngLat, SiteId};
use crate::engine::{ControlId, MarkerId, PopupOptions};

/// Visueller Zustand eines Markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualState {
    #[default]
    Idle,
    /// Transient, vom Zeiger gesteuert
    Hovered,
    Active,
}

/// Nicht angehängtes Popup, gebunden an die Position seiner Site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupSlot {
    pub anchor: LngLat,
    pub options: PopupOptions,
}

/// Marker und Popup-Slot einer Site (lebt so lange wie die Karteninstanz).
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayHandle {
    pub site_id: SiteId,
    /// Dauerhaft angehängter Marker
    pub marker: MarkerId,
    pub popup_slot: PopupSlot,
    pub visual_state: VisualState,
}

/// Feste Panels außerhalb der Kartenfläche.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromeState {
    pub legend: Option<ControlId>,
    pub badge: Option<ControlId>,
}

impl ChromeState {
    /// Entnimmt alle Control-Handles (für den Teardown).
    pub fn take_all(&mut self) -> Vec<ControlId> {
        [self.legend.take(), self.badge.take()]
            .into_iter()
            .flatten()
            .collect()
    }
}
