//! Use-Cases für Mount, Overlay-Aufbau und Teardown einer Karteninstanz.

use crate::app::state::{MapLifecycle, OverlayHandle, PopupSlot, PopupState, VisualState};
use crate::app::AppState;
use crate::engine::{ControlCorner, MapAdapter, MapEngine};
use crate::errors::EngineInitError;
use crate::overlay;
use std::sync::Arc;

/// Mountet die Karte (Unmounted → Mounting).
///
/// Ein fehlgeschlagener Mount hinterlässt keinen halben Zustand: die Engine
/// wird wieder freigegeben und der Lebenszyklus bleibt `Unmounted`.
pub fn mount_map<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
) -> Result<(), EngineInitError> {
    if state.lifecycle != MapLifecycle::Unmounted {
        log::warn!("Mount ignoriert: Karte ist bereits {:?}", state.lifecycle);
        return Ok(());
    }

    state.lifecycle = MapLifecycle::Mounting;
    if let Err(e) = map.mount(&state.options) {
        log::warn!("{}", e);
        map.unmount();
        state.lifecycle = MapLifecycle::Unmounted;
        return Err(e);
    }
    Ok(())
}

/// Blendet Default-Layer aus; ohne gemountete Karte passiert nichts.
pub fn hide_default_layers<E: MapEngine>(map: &mut MapAdapter<E>) -> usize {
    if !map.is_mounted() {
        log::debug!("Layer-Ausblendung übersprungen: keine Karte gemountet");
        return 0;
    }
    map.hide_default_layers()
}

/// Baut ein Overlay-Handle pro gültiger Site sowie Legende und Badge auf.
///
/// Nur ein ungültiges Karten-Handle bricht ab. Einzelne Sites, die außerhalb
/// des Kartenbereichs liegen oder nicht angehängt werden können, werden
/// protokolliert und übersprungen.
pub fn initialize_overlays<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
) -> Result<usize, EngineInitError> {
    if !map.is_mounted() {
        return Err(EngineInitError::InvalidHandle);
    }

    let bounds = state.options.bounds();
    let popup_options = state.popup_options();
    let catalog = Arc::clone(&state.catalog);

    for site in catalog.iter() {
        if state.overlays.contains_key(&site.id) {
            continue;
        }
        if let Err(e) = site.check_bounds(&bounds) {
            log::warn!("Site übersprungen: {}", e);
            continue;
        }
        match map.attach_marker(overlay::create_marker(site), site.position) {
            Ok(marker) => {
                state.overlays.insert(
                    site.id.clone(),
                    OverlayHandle {
                        site_id: site.id.clone(),
                        marker,
                        popup_slot: PopupSlot {
                            anchor: site.position,
                            options: popup_options,
                        },
                        visual_state: VisualState::Idle,
                    },
                );
            }
            Err(e) => log::warn!("Marker für '{}' nicht angehängt: {}", site.id, e),
        }
    }

    attach_chrome(state, map);

    log::info!(
        "{} von {} Sites als Overlay aufgebaut",
        state.overlays.len(),
        catalog.len()
    );
    Ok(state.overlays.len())
}

fn attach_chrome<E: MapEngine>(state: &mut AppState, map: &mut MapAdapter<E>) {
    if state.chrome.legend.is_none() {
        match map.attach_control(overlay::create_legend(), ControlCorner::TopLeft) {
            Ok(id) => state.chrome.legend = Some(id),
            Err(e) => log::warn!("Legende nicht angehängt: {}", e),
        }
    }
    if state.chrome.badge.is_none() {
        let badge = overlay::create_site_count_badge(state.overlays.len());
        match map.attach_control(badge, ControlCorner::BottomLeft) {
            Ok(id) => state.chrome.badge = Some(id),
            Err(e) => log::warn!("Site-Badge nicht angehängt: {}", e),
        }
    }
}

/// Löst Popup, Dismiss-Listener, Marker und Panels und gibt die Karte frei.
///
/// Mehrfach aufrufbar, auch mitten in einer Kamerafahrt oder mit geplantem
/// Popup-Attach (der Timer läuft dann ins Leere).
pub fn teardown<E: MapEngine>(state: &mut AppState, map: &mut MapAdapter<E>) {
    if let PopupState::Attached { popup_id, .. } = std::mem::take(&mut state.popup) {
        map.detach_popup(popup_id);
    }
    if let Some(listener) = state.dismiss_listener.take() {
        map.unregister_click_listener(listener);
    }
    for (_, handle) in state.overlays.drain(..) {
        map.detach_marker(handle.marker);
    }
    for control in state.chrome.take_all() {
        map.detach_control(control);
    }

    state.selection.active_site_id = None;
    state.selection.bump();
    state.ui.upload_picker = None;
    state.ui.pending_upload = None;

    map.unmount();

    if state.lifecycle != MapLifecycle::Unmounted {
        log::info!("Karte abgebaut");
    }
    state.lifecycle = MapLifecycle::Unmounted;
}
