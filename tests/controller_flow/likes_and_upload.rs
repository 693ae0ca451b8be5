use super::{a, b, Harness};
use cultural_site_map::overlay::factory::LIKE_COUNT_CLASS;
use cultural_site_map::overlay::NodeAction;
use cultural_site_map::{
    AppIntent, EngineOp, ImageBlob, ImageUploader, LikeState, MemoryUploader, SiteId, UploadError,
};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

fn png(name: &str) -> ImageBlob {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.resize(256, 0);
    ImageBlob::new(name, "image/png", bytes)
}

fn like_state(h: &Harness) -> LikeState {
    h.state
        .popup
        .instance()
        .map(|i| i.like)
        .expect("Popup-Instanz vorhanden")
}

fn rendered_like_count(h: &Harness) -> String {
    let id = h
        .engine()
        .find_popup_element(LIKE_COUNT_CLASS)
        .expect("Like-Zähler sichtbar");
    h.engine()
        .element(id)
        .and_then(|el| el.text.clone())
        .unwrap_or_default()
}

fn click_like(h: &mut Harness, site: &SiteId) {
    let like = h.target(NodeAction::ToggleLike(site.clone()));
    h.click(like);
}

/// Durchläuft Picker, Prüfung und Transport wie der Host.
fn upload_through(h: &mut Harness, uploader: &mut MemoryUploader, blob: ImageBlob) {
    h.intent(AppIntent::UploadRequested { site_id: a() });
    h.intent(AppIntent::ImageFileChosen {
        site_id: a(),
        blob,
    });
    if let Some(pending) = h.state.ui.take_pending_upload() {
        let result = uploader.upload(&pending.blob);
        h.intent(AppIntent::ImageUploadFinished {
            site_id: pending.site_id,
            result,
        });
    }
}

#[test]
fn test_like_toggles_and_updates_in_place() {
    let mut h = Harness::ready_immediate();
    h.click_marker(&a());
    let popup = h.state.popup.popup_id().expect("Popup angehängt");

    assert_eq!(like_state(&h), LikeState { liked: false, count: 0 });

    click_like(&mut h, &a());
    assert_eq!(like_state(&h), LikeState { liked: true, count: 1 });
    assert_eq!(rendered_like_count(&h), "1");

    click_like(&mut h, &a());
    assert_eq!(like_state(&h), LikeState { liked: false, count: 0 });
    assert_eq!(rendered_like_count(&h), "0");

    assert_eq!(h.state.popup.popup_id(), Some(popup));
    assert_eq!(
        h.journal_count(|op| *op == EngineOp::PopupContentReplaced(popup)),
        2
    );
    assert_eq!(h.journal_count(|op| matches!(op, EngineOp::PopupAdded(_))), 1);
}

#[test]
fn test_like_state_resets_on_reselect() {
    let mut h = Harness::ready_immediate();
    h.click_marker(&a());
    click_like(&mut h, &a());
    assert!(like_state(&h).liked);

    h.click_marker(&a());
    h.click_marker(&a());

    assert_eq!(like_state(&h), LikeState { liked: false, count: 0 });
    assert_eq!(rendered_like_count(&h), "0");
}

#[test]
fn test_like_seed_comes_from_catalog() {
    let mut h = Harness::ready_immediate();
    h.click_marker(&b());
    assert_eq!(rendered_like_count(&h), "5");

    click_like(&mut h, &b());
    assert_eq!(like_state(&h), LikeState { liked: true, count: 6 });
    assert_eq!(rendered_like_count(&h), "6");
}

#[test]
fn test_like_for_other_site_is_ignored() {
    let mut h = Harness::ready_immediate();
    h.click_marker(&a());

    h.intent(AppIntent::LikeToggleClicked { site_id: b() });

    assert_eq!(like_state(&h), LikeState { liked: false, count: 0 });
}

#[test]
fn test_successful_upload_replaces_image_in_place() {
    let mut h = Harness::ready_immediate();
    let mut uploader = MemoryUploader::new();
    h.click_marker(&a());
    let popup = h.state.popup.popup_id().expect("Popup angehängt");

    upload_through(&mut h, &mut uploader, png("hafen.png"));

    let url = "memory://uploads/1/hafen.png";
    assert_eq!(h.state.image_overrides.get(&a()).map(String::as_str), Some(url));
    assert_eq!(h.state.popup.popup_id(), Some(popup));
    let image = h
        .engine()
        .find_popup_element("popup-image")
        .and_then(|id| h.engine().element(id))
        .and_then(|el| el.attributes.get("src").cloned())
        .expect("Bild-Quelle vorhanden");
    assert_eq!(image, url);
    assert_eq!(h.state.ui.notice.as_deref(), Some("Bild für Site A hochgeladen"));
    assert!(h.state.ui.upload_picker.is_none());
    assert_eq!(h.state.selection.active_site_id, Some(a()));
    assert!(uploader.get(url).is_some());
}

#[test]
fn test_uploaded_image_survives_reselect() {
    let mut h = Harness::ready_immediate();
    let mut uploader = MemoryUploader::new();
    h.click_marker(&a());
    upload_through(&mut h, &mut uploader, png("hafen.png"));

    h.click_marker(&b());
    h.click_marker(&a());

    let instance = h.state.popup.instance().expect("Popup-Instanz vorhanden");
    assert_eq!(instance.image_url, "memory://uploads/1/hafen.png");
}

#[test]
fn test_rejected_upload_keeps_selection_and_sets_notice() {
    let mut h = Harness::ready_immediate();
    let mut uploader = MemoryUploader::new();
    h.click_marker(&a());
    h.engine_mut().clear_journal();

    let text = ImageBlob::new("notes.txt", "text/plain", b"kein bild".to_vec());
    upload_through(&mut h, &mut uploader, text);

    assert!(uploader.is_empty());
    assert!(h.state.image_overrides.is_empty());
    let notice = h.state.ui.notice.clone().expect("Hinweis gesetzt");
    assert!(notice.contains("text/plain"));
    assert_eq!(h.state.selection.active_site_id, Some(a()));
    assert!(h.state.popup.is_attached());
    assert!(h.engine().journal().is_empty());
}

#[test]
fn test_oversized_upload_is_rejected() {
    let mut options = cultural_site_map::MapOptions::default();
    options.popup_attach_delay_ms = 0;
    options.upload_max_bytes = 128;
    let mut h = Harness::ready_with(options);
    let mut uploader = MemoryUploader::new();
    h.click_marker(&a());

    upload_through(&mut h, &mut uploader, png("gross.png"));

    assert!(uploader.is_empty());
    let notice = h.state.ui.notice.clone().expect("Hinweis gesetzt");
    assert_eq!(
        notice,
        UploadError::TooLarge {
            size: 256,
            limit: 128
        }
        .to_string()
    );
}

#[test]
fn test_transport_failure_sets_notice_and_keeps_image() {
    let mut h = Harness::ready_immediate();
    let mut uploader = MemoryUploader::failing("Server nicht erreichbar");
    h.click_marker(&a());

    upload_through(&mut h, &mut uploader, png("hafen.png"));

    assert!(h.state.image_overrides.is_empty());
    assert_eq!(
        h.state.ui.notice.as_deref(),
        Some("Upload fehlgeschlagen: Server nicht erreichbar")
    );
    let instance = h.state.popup.instance().expect("Popup-Instanz vorhanden");
    assert_eq!(instance.image_url, "https://example.invalid/a.jpg");
}

#[test]
fn test_notice_can_be_dismissed() {
    let mut h = Harness::ready_immediate();
    let mut uploader = MemoryUploader::failing("offline");
    h.click_marker(&a());
    upload_through(&mut h, &mut uploader, png("hafen.png"));
    assert!(h.state.ui.notice.is_some());

    h.intent(AppIntent::NoticeDismissed);

    assert!(h.state.ui.notice.is_none());
}

#[test]
fn test_cancelled_upload_closes_picker() {
    let mut h = Harness::ready_immediate();
    h.click_marker(&a());
    h.intent(AppIntent::UploadRequested { site_id: a() });
    assert_eq!(h.state.ui.upload_picker, Some(a()));

    h.intent(AppIntent::UploadCancelled);

    assert!(h.state.ui.upload_picker.is_none());
    assert!(h.state.ui.pending_upload.is_none());
}

#[test]
fn test_image_without_open_picker_is_not_staged() {
    let mut h = Harness::ready_immediate();
    h.click_marker(&a());

    h.intent(AppIntent::ImageFileChosen {
        site_id: SiteId::from("ghost"),
        blob: png("geist.png"),
    });
    assert!(h.state.ui.pending_upload.is_none());
    assert_eq!(
        h.state.ui.notice,
        Some(UploadError::NotRequested(SiteId::from("ghost")).to_string())
    );

    // Picker für A offen, Bild für B gewählt
    h.intent(AppIntent::UploadRequested { site_id: a() });
    h.intent(AppIntent::ImageFileChosen {
        site_id: b(),
        blob: png("falsch.png"),
    });
    assert!(h.state.ui.pending_upload.is_none());
    assert_eq!(h.state.ui.upload_picker, Some(a()));
    assert_eq!(h.state.selection.active_site_id, Some(a()));
}

#[test]
fn test_late_result_after_cancel_is_discarded() {
    let mut h = Harness::ready_immediate();
    h.click_marker(&a());
    h.engine_mut().clear_journal();

    h.intent(AppIntent::UploadRequested { site_id: a() });
    h.intent(AppIntent::UploadCancelled);
    h.intent(AppIntent::ImageUploadFinished {
        site_id: a(),
        result: Ok("memory://late".to_string()),
    });

    assert!(h.state.image_overrides.is_empty());
    assert!(h.state.ui.notice.is_none());
    let instance = h.state.popup.instance().expect("Popup-Instanz vorhanden");
    assert_eq!(instance.image_url, "https://example.invalid/a.jpg");
    assert_eq!(
        h.journal_count(|op| matches!(op, EngineOp::PopupContentReplaced(_))),
        0
    );
}

#[test]
fn test_declared_type_must_match_image_content() {
    let mut h = Harness::ready_immediate();
    let mut uploader = MemoryUploader::new();
    h.click_marker(&a());

    let mut blob = png("hafen.jpg");
    blob.mime_type = "image/jpeg".to_string();
    upload_through(&mut h, &mut uploader, blob);

    assert!(uploader.is_empty());
    assert!(h.state.image_overrides.is_empty());
    let notice = h.state.ui.notice.clone().expect("Hinweis gesetzt");
    assert!(notice.contains("image/png"));
}
