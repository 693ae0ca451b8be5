//! Application State: zentrale Datenhaltung einer Karteninstanz.

mod app_state;
mod overlays;
mod popup;
mod selection;
mod ui;

pub use app_state::AppState;
pub use overlays::{ChromeState, OverlayHandle, PopupSlot, VisualState};
pub use popup::{PopupInstance, PopupState};
pub use selection::SelectionState;
pub use ui::{PendingUpload, UiState};

/// Lebenszyklus einer Karteninstanz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapLifecycle {
    /// Keine Karte (Start- und Endzustand)
    #[default]
    Unmounted,
    /// Engine gemountet, Style lädt noch
    Mounting,
    /// Overlays aufgebaut, Selektion möglich
    Ready,
}
