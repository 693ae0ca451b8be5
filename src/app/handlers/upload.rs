//! Handler für Dateiauswahl, Upload-Prüfung und Hinweise.

use crate::app::use_cases;
use crate::app::AppState;
use crate::core::SiteId;
use crate::engine::{MapAdapter, MapEngine};
use crate::errors::UploadError;
use crate::upload::ImageBlob;

pub fn open_picker(state: &mut AppState, site_id: SiteId) {
    use_cases::upload::open_picker(state, site_id);
}

pub fn prepare(state: &mut AppState, site_id: SiteId, blob: ImageBlob) {
    use_cases::upload::prepare_upload(state, site_id, blob);
}

pub fn apply_result<E: MapEngine>(
    state: &mut AppState,
    map: &mut MapAdapter<E>,
    site_id: SiteId,
    result: Result<String, UploadError>,
) {
    use_cases::upload::apply_upload_result(state, map, site_id, result);
}

pub fn close_picker(state: &mut AppState) {
    use_cases::upload::close_picker(state);
}

pub fn dismiss_notice(state: &mut AppState) {
    use_cases::upload::dismiss_notice(state);
}
