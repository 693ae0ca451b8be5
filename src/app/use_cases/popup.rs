//! Use-Cases für das Popup der aktiven Site: Attach mit Race-Guard und Likes.

use crate::app::state::{PopupInstance, PopupState};
use crate::app::AppState;
use crate::core::{Site, SiteId};
use crate::engine::{MapAdapter, MapEngine};
use crate::errors::RaceGuardViolation;
use crate::overlay::{self, VisualNode};
use crate::shared::MapOptions;
use anyhow::Context;

/// Baut den Popup-Inhalt einer Instanz.
pub fn render_popup(site: &Site, instance: &PopupInstance, options: &MapOptions) -> VisualNode {
    overlay::create_popup_content(site, &instance.view(&options.location_label))
}

/// Hängt eine Instanz an der Position ihres Popup-Slots an.
pub(crate) fn attach_instance<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    instance: PopupInstance,
) -> anyhow::Result<()> {
    let slot = state
        .overlays
        .get(&instance.site_id)
        .map(|h| h.popup_slot)
        .with_context(|| format!("Kein Popup-Slot für '{}'", instance.site_id))?;
    let site = state
        .catalog
        .get(&instance.site_id)
        .with_context(|| format!("Site '{}' fehlt im Katalog", instance.site_id))?;

    let content = render_popup(site, &instance, &state.options);
    let popup_id = map.attach_popup(content, slot.anchor, &slot.options)?;
    log::debug!("Popup für '{}' angehängt", instance.site_id);
    state.popup = PopupState::Attached { instance, popup_id };
    Ok(())
}

/// Prüft, ob ein verzögerter Attach noch zur aktuellen Selektion gehört.
pub fn race_guard(
    state: &AppState,
    site_id: &SiteId,
    generation: u64,
) -> Result<(), RaceGuardViolation> {
    let scheduled = matches!(
        &state.popup,
        PopupState::Scheduled { instance, generation: g }
            if *g == generation && &instance.site_id == site_id
    );
    if scheduled
        && state.selection.is_active(site_id)
        && state.selection.generation == generation
    {
        Ok(())
    } else {
        Err(RaceGuardViolation {
            site_id: site_id.clone(),
            generation,
        })
    }
}

/// Führt einen fälligen Popup-Attach aus, sofern der Race-Guard ihn erlaubt.
///
/// Veraltete Timer werden still verworfen (nur Debug-Log).
pub fn attach_scheduled_popup<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    site_id: &SiteId,
    generation: u64,
) -> anyhow::Result<bool> {
    if let Err(violation) = race_guard(state, site_id, generation) {
        log::debug!("Popup-Attach unterdrückt: {}", violation);
        return Ok(false);
    }
    if let PopupState::Scheduled { instance, .. } = std::mem::take(&mut state.popup) {
        attach_instance(state, map, instance)?;
    }
    Ok(true)
}

/// Schaltet den Like des angehängten Popups um und aktualisiert es in-place.
pub fn toggle_like<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    site_id: &SiteId,
) -> bool {
    let PopupState::Attached { instance, .. } = &mut state.popup else {
        log::debug!("Like für '{}' ignoriert: kein Popup angehängt", site_id);
        return false;
    };
    if &instance.site_id != site_id {
        log::debug!("Like für '{}' ignoriert: Popup gehört zu '{}'", site_id, instance.site_id);
        return false;
    }
    instance.like = instance.like.toggle();
    refresh_attached_popup(state, map)
}

/// Ersetzt den Inhalt des angehängten Popups durch den aktuellen Stand.
pub fn refresh_attached_popup<E: MapEngine>(state: &AppState, map: &mut MapAdapter<E>) -> bool {
    let PopupState::Attached { instance, popup_id } = &state.popup else {
        return false;
    };
    let Some(site) = state.catalog.get(&instance.site_id) else {
        return false;
    };
    map.replace_popup_content(*popup_id, render_popup(site, instance, &state.options));
    true
}
