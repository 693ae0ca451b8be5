//! Handler für Selektions-Operationen.

use crate::app::use_cases;
use crate::app::AppState;
use crate::core::SiteId;
use crate::engine::{ElementId, MapAdapter, MapEngine};

/// Schaltet die Selektion einer Site um.
pub fn toggle<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    site_id: SiteId,
) -> anyhow::Result<()> {
    use_cases::selection::toggle_selection(state, map, site_id)?;
    Ok(())
}

/// Hebt die Selektion auf.
pub fn clear<E: MapEngine>(state: &mut AppState, map: &mut MapAdapter<E>) -> anyhow::Result<()> {
    use_cases::selection::clear_selection(state, map)?;
    Ok(())
}

/// Hebt die Selektion bei einem Klick außerhalb aller Marker auf.
pub fn dismiss_on_background_click<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    target: Option<ElementId>,
) -> anyhow::Result<()> {
    use_cases::selection::dismiss_on_background_click(state, map, target)?;
    Ok(())
}

/// Setzt den Hover-Zustand eines Markers.
pub fn set_hover<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    site_id: &SiteId,
    hovered: bool,
) {
    use_cases::selection::set_marker_hover(state, map, site_id, hovered);
}
