//! Handler für Mount, Style-Ready und Teardown.

use crate::app::state::MapLifecycle;
use crate::app::use_cases;
use crate::app::AppState;
use crate::engine::{MapAdapter, MapEngine};

/// Mountet die Karte; ein Fehler geht an den Aufrufer.
pub fn mount<E: MapEngine>(state: &mut AppState, map: &mut MapAdapter<E>) -> anyhow::Result<()> {
    use_cases::lifecycle::mount_map(state, map)?;
    Ok(())
}

/// Blendet Default-Layer aus (auch bei wiederholtem Style-Ready).
pub fn hide_default_layers<E: MapEngine>(map: &mut MapAdapter<E>) {
    use_cases::lifecycle::hide_default_layers(map);
}

/// Baut die Overlays beim ersten Style-Ready auf (Mounting → Ready).
pub fn initialize_overlays<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
) -> anyhow::Result<()> {
    match state.lifecycle {
        MapLifecycle::Mounting => {
            use_cases::lifecycle::initialize_overlays(state, map)?;
            state.lifecycle = MapLifecycle::Ready;
            log::info!("Karte bereit");
        }
        MapLifecycle::Ready => log::debug!("Overlays bestehen bereits"),
        MapLifecycle::Unmounted => log::warn!("Style-Ready ohne gemountete Karte ignoriert"),
    }
    Ok(())
}

/// Baut die Karteninstanz ab (mehrfach aufrufbar).
pub fn teardown<E: MapEngine>(state: &mut AppState, map: &mut MapAdapter<E>) {
    use_cases::lifecycle::teardown(state, map);
}
