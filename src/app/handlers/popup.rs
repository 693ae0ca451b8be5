//! Handler für das Popup der aktiven Site.

use crate::app::use_cases;
use crate::app::AppState;
use crate::core::SiteId;
use crate::engine::{MapAdapter, MapEngine};

/// Hängt ein geplantes Popup an, sofern es noch aktuell ist.
pub fn attach_scheduled<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    site_id: &SiteId,
    generation: u64,
) -> anyhow::Result<()> {
    use_cases::popup::attach_scheduled_popup(state, map, site_id, generation)?;
    Ok(())
}

/// Schaltet den Like im angehängten Popup um.
pub fn toggle_like<E: MapEngine>(state: &mut AppState, map: &mut MapAdapter<E>, site_id: &SiteId) {
    use_cases::popup::toggle_like(state, map, site_id);
}
