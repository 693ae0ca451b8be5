//! Use-Cases der Einzel-Selektion und die zentrale Reconciliation.

use super::popup;
use crate::app::state::{PopupInstance, PopupState, VisualState};
use crate::app::AppState;
use crate::core::SiteId;
use crate::engine::{ElementId, MapAdapter, MapEngine, TimerToken};
use crate::shared::theme::{ACTIVE_CLASS, HOVERED_CLASS};
use anyhow::Context;
use std::sync::Arc;

/// Aktiviert eine Site bzw. hebt die Selektion auf, wenn sie schon aktiv ist.
///
/// Gibt `false` zurück, wenn der Aufruf abgelehnt wurde (Karte nicht bereit
/// oder unbekannte Site); der Zustand bleibt dann unverändert.
pub fn toggle_selection<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    site_id: SiteId,
) -> anyhow::Result<bool> {
    if !state.is_ready() {
        log::warn!(
            "Selektion von '{}' ignoriert: Karte ist {:?}",
            site_id,
            state.lifecycle
        );
        return Ok(false);
    }
    if !state.overlays.contains_key(&site_id) {
        log::warn!("Selektion ignoriert: Site '{}' hat kein Overlay", site_id);
        return Ok(false);
    }

    let previous = state.selection.active_site_id.clone();
    state.selection.active_site_id = if previous.as_ref() == Some(&site_id) {
        None
    } else {
        Some(site_id)
    };
    reconcile(state, map, previous)?;
    Ok(true)
}

/// Hebt die Selektion auf; ohne aktive Site passiert nichts.
pub fn clear_selection<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
) -> anyhow::Result<bool> {
    if !state.is_ready() {
        return Ok(false);
    }
    let Some(previous) = state.selection.active_site_id.take() else {
        return Ok(false);
    };
    reconcile(state, map, Some(previous))?;
    Ok(true)
}

/// Hintergrund-Klick: hebt die Selektion auf, wenn das Target in keinem Marker liegt.
pub fn dismiss_on_background_click<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    target: Option<ElementId>,
) -> anyhow::Result<bool> {
    if map.is_inside_marker(target) {
        log::debug!("Klick innerhalb eines Markers, Selektion bleibt");
        return Ok(false);
    }
    clear_selection(state, map)
}

/// Setzt den transienten Hover-Zustand; aktive Marker bleiben unverändert.
pub fn set_marker_hover<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    site_id: &SiteId,
    hovered: bool,
) {
    if !state.is_ready() {
        return;
    }
    let Some(handle) = state.overlays.get_mut(site_id) else {
        return;
    };
    if handle.visual_state == VisualState::Active {
        return;
    }
    handle.visual_state = if hovered {
        VisualState::Hovered
    } else {
        VisualState::Idle
    };
    map.set_marker_class(handle.marker, HOVERED_CLASS, hovered);
}

/// Bringt Marker, Popup, Kamera und Dismiss-Listener in Einklang mit der Selektion.
///
/// Reihenfolge: Visual-Pass über alle Handles, Popup lösen, frische
/// Popup-Instanz bauen, Kamerafahrt starten, Popup anhängen (sofort oder per
/// Timer), Dismiss-Listener tauschen. Fehler hier sind gebrochene Invarianten
/// und werden nicht abgefangen.
pub fn reconcile<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    previous: Option<SiteId>,
) -> anyhow::Result<()> {
    let generation = state.selection.bump();
    let active = state.selection.active_site_id.clone();
    log::debug!(
        "Reconciliation #{}: {:?} -> {:?}",
        generation,
        previous.as_ref().map(SiteId::as_str),
        active.as_ref().map(SiteId::as_str)
    );

    for handle in state.overlays.values_mut() {
        let is_active = active.as_ref() == Some(&handle.site_id);
        if handle.visual_state == VisualState::Hovered {
            map.set_marker_class(handle.marker, HOVERED_CLASS, false);
        }
        handle.visual_state = if is_active {
            VisualState::Active
        } else {
            VisualState::Idle
        };
        map.set_marker_class(handle.marker, ACTIVE_CLASS, is_active);
    }

    match std::mem::take(&mut state.popup) {
        PopupState::Attached { popup_id, .. } => map.detach_popup(popup_id),
        PopupState::Scheduled { instance, .. } => {
            log::debug!("Geplanter Popup-Attach für '{}' verworfen", instance.site_id);
        }
        PopupState::Empty => {}
    }

    match &active {
        Some(site_id) => {
            let anchor = state
                .overlays
                .get(site_id)
                .map(|h| h.popup_slot.anchor)
                .with_context(|| format!("Kein Overlay-Handle für aktive Site '{site_id}'"))?;
            let catalog = Arc::clone(&state.catalog);
            let site = catalog
                .get(site_id)
                .with_context(|| format!("Aktive Site '{site_id}' fehlt im Katalog"))?;
            let instance = PopupInstance::fresh(site, &state.image_url_for(site));

            map.ease_camera(&state.options.close_up(anchor));

            let delay = state.options.popup_attach_delay();
            if delay.is_zero() {
                popup::attach_instance(state, map, instance)?;
            } else {
                map.schedule(
                    delay,
                    TimerToken::AttachPopup {
                        site_id: site_id.clone(),
                        generation,
                    },
                );
                state.popup = PopupState::Scheduled {
                    instance,
                    generation,
                };
            }
        }
        None => map.ease_camera(&state.options.default_view()),
    }

    if let Some(old) = state.dismiss_listener.take() {
        map.unregister_click_listener(old);
    }
    if active.is_some() {
        state.dismiss_listener = Some(map.register_click_listener());
    }

    Ok(())
}
