//! Use-Cases für den Bild-Upload (Prüfung hier, Transport beim Host).

use super::popup;
use crate::app::state::{PendingUpload, PopupState};
use crate::app::AppState;
use crate::core::SiteId;
use crate::engine::{MapAdapter, MapEngine};
use crate::errors::UploadError;
use crate::upload::{self, ImageBlob};

/// Öffnet die Dateiauswahl für eine bekannte Site.
pub fn open_picker(state: &mut AppState, site_id: SiteId) {
    if state.site(&site_id).is_none() {
        log::warn!("Upload für unbekannte Site '{}' ignoriert", site_id);
        return;
    }
    state.ui.upload_picker = Some(site_id);
}

/// Prüft das gewählte Bild und stellt es für den Transport bereit.
///
/// Nur zulässig, solange die Dateiauswahl für genau diese Site offen ist.
/// Abgelehnte Bilder erzeugen einen Hinweis, die Selektion bleibt unberührt.
pub fn prepare_upload(state: &mut AppState, site_id: SiteId, blob: ImageBlob) -> bool {
    if state.ui.upload_picker.as_ref() != Some(&site_id) || state.site(&site_id).is_none() {
        log::warn!(
            "Bild '{}' für '{}' verworfen: keine offene Dateiauswahl",
            blob.file_name,
            site_id
        );
        state.ui.notice = Some(UploadError::NotRequested(site_id).to_string());
        return false;
    }

    match upload::validate(&blob, state.options.upload_max_bytes) {
        Ok(format) => {
            log::debug!(
                "Upload für '{}' bereit: {} ({:?}, {} Bytes)",
                site_id,
                blob.file_name,
                format,
                blob.size()
            );
            state.ui.pending_upload = Some(PendingUpload { site_id, blob });
            true
        }
        Err(e) => {
            log::warn!("Upload für '{}' abgelehnt: {}", site_id, e);
            state.ui.notice = Some(e.to_string());
            state.ui.upload_picker = None;
            false
        }
    }
}

/// Übernimmt das Transport-Ergebnis.
///
/// Eine neue URL ersetzt das Bild der Site für die restliche Sitzung; ein
/// angehängtes Popup dieser Site wird in-place aktualisiert. Ergebnisse ohne
/// laufenden Upload für die Site (z.B. nach Abbruch) werden verworfen.
pub fn apply_upload_result<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    site_id: SiteId,
    result: Result<String, UploadError>,
) -> bool {
    let in_flight = state.ui.upload_picker.as_ref() == Some(&site_id)
        || state
            .ui
            .pending_upload
            .as_ref()
            .is_some_and(|p| p.site_id == site_id);
    if !in_flight {
        log::debug!("Upload-Ergebnis für '{}' ohne laufenden Upload verworfen", site_id);
        return false;
    }
    state.ui.upload_picker = None;
    state.ui.pending_upload = None;

    let url = match result {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Upload für '{}' fehlgeschlagen: {}", site_id, e);
            state.ui.notice = Some(e.to_string());
            return false;
        }
    };
    let Some(name) = state.site(&site_id).map(|s| s.name.clone()) else {
        log::warn!("Upload-Ergebnis für unbekannte Site '{}' verworfen", site_id);
        return false;
    };

    state.image_overrides.insert(site_id.clone(), url.clone());
    let mut shows_site = false;
    if let PopupState::Scheduled { instance, .. } | PopupState::Attached { instance, .. } =
        &mut state.popup
    {
        if instance.site_id == site_id {
            instance.image_url = url;
            shows_site = true;
        }
    }
    if shows_site {
        popup::refresh_attached_popup(state, map);
    }

    log::info!("Bild für '{}' hochgeladen", site_id);
    state.ui.notice = Some(format!("Bild für {name} hochgeladen"));
    true
}

pub fn close_picker(state: &mut AppState) {
    state.ui.upload_picker = None;
    state.ui.pending_upload = None;
}

pub fn dismiss_notice(state: &mut AppState) {
    state.ui.notice = None;
}
