use super::{a, two_site_catalog, Harness, TWO_SITES_JSON};
use cultural_site_map::engine::{LayerKind, StyleLayer};
use cultural_site_map::shared::theme::{self, THEME_STYLESHEET_ID};
use cultural_site_map::{
    AppCommand, AppIntent, EngineOp, GeoBounds, HeadlessEngine, MapEngine, MapLifecycle,
    MapOptions, PopupState, SiteCatalog, SiteId,
};

#[test]
fn test_mount_hides_poi_and_label_layers_and_adds_chrome() {
    let h = Harness::ready();

    let hidden: Vec<&str> = h
        .engine()
        .layers()
        .iter()
        .filter(|l| !l.visible)
        .map(|l| l.id.as_str())
        .collect();
    assert_eq!(
        hidden,
        vec!["POI_transit", "poi_restaurant", "place_label_city", "road_label"]
    );
    assert!(h
        .engine()
        .layers()
        .iter()
        .any(|l| l.id == "road_primary" && l.visible));
    assert_eq!(h.engine().control_count(), 2);
    assert!(h.engine().has_navigation_control());
    assert!(h.engine().has_stylesheet(THEME_STYLESHEET_ID));
    assert!(h.state.chrome.legend.is_some());
    assert!(h.state.chrome.badge.is_some());
}

#[test]
fn test_badge_counts_attached_sites() {
    let h = Harness::ready();
    let badge = h
        .engine()
        .find_control_element("site-count-badge")
        .expect("Badge angehängt");
    let text: String = h
        .engine()
        .element(badge)
        .map(|el| {
            el.children
                .iter()
                .filter_map(|c| h.engine().element(*c))
                .filter_map(|c| c.text.clone())
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(text, "2 Cultural Sites");
}

#[test]
fn test_selection_is_ignored_before_ready() {
    let mut h = Harness::new(
        two_site_catalog(),
        MapOptions::default(),
        HeadlessEngine::new().deferred_style_load(),
    );
    h.intent(AppIntent::MountRequested);
    assert_eq!(h.state.lifecycle, MapLifecycle::Mounting);
    assert_eq!(h.engine().marker_count(), 0);

    h.intent(AppIntent::MarkerClicked { site_id: a() });
    assert!(h.state.selection.active_site_id.is_none());
    assert!(h.engine().camera_target().is_none());

    h.engine_mut().emit_style_loaded();
    h.pump();

    assert_eq!(h.state.lifecycle, MapLifecycle::Ready);
    assert_eq!(h.engine().marker_count(), 2);
}

#[test]
fn test_repeated_style_loaded_is_idempotent() {
    let mut h = Harness::ready();
    h.click_marker(&a());

    h.intent(AppIntent::MapStyleLoaded);

    assert_eq!(h.state.lifecycle, MapLifecycle::Ready);
    assert_eq!(h.state.overlays.len(), 2);
    assert_eq!(h.engine().marker_count(), 2);
    assert_eq!(h.engine().control_count(), 2);
    assert_eq!(h.state.selection.active_site_id, Some(a()));
    assert_eq!(h.journal_count(|op| matches!(op, EngineOp::LayerHidden(_))), 0);
    assert_eq!(h.journal_count(|op| matches!(op, EngineOp::MarkerAdded(_))), 0);
}

#[test]
fn test_mount_failure_reports_error_and_builds_nothing() {
    let mut h = Harness::new(
        two_site_catalog(),
        MapOptions::default(),
        HeadlessEngine::new().failing_mount("WebGL nicht verfügbar"),
    );

    let result = h
        .controller
        .handle_intent(&mut h.state, AppIntent::MountRequested);

    let err = result.expect_err("Mount sollte fehlschlagen");
    assert!(format!("{err:#}").contains("WebGL nicht verfügbar"));
    assert_eq!(h.state.lifecycle, MapLifecycle::Unmounted);
    assert!(h.state.overlays.is_empty());
    assert_eq!(h.engine().marker_count(), 0);
    assert!(!h.engine().is_mounted());

    // Teardown nach fehlgeschlagenem Mount ist sicher
    h.intent(AppIntent::TeardownRequested);
    assert_eq!(h.state.lifecycle, MapLifecycle::Unmounted);
}

#[test]
fn test_second_mount_request_is_ignored() {
    let mut h = Harness::ready();

    h.intent(AppIntent::MountRequested);

    assert_eq!(h.state.lifecycle, MapLifecycle::Ready);
    assert_eq!(h.journal_count(|op| *op == EngineOp::Mounted), 0);
}

#[test]
fn test_site_outside_bounds_is_skipped() {
    // Katalog mit weitem Bereich laden, Karte aber eng begrenzen
    let wide = GeoBounds::from_corners([[-180.0, -90.0], [180.0, 90.0]]);
    let json = TWO_SITES_JSON.replace("[27.140, 38.418]", "[28.97, 41.0]");
    let catalog = SiteCatalog::from_json(&json, &wide).expect("Katalog parsebar");
    assert_eq!(catalog.len(), 2);

    let mut h = Harness::new(catalog, MapOptions::default(), HeadlessEngine::new());
    h.intent(AppIntent::MountRequested);

    assert_eq!(h.state.lifecycle, MapLifecycle::Ready);
    assert_eq!(h.state.overlays.len(), 1);
    assert!(h.state.overlays.contains_key(&a()));
    assert_eq!(h.engine().marker_count(), 1);

    h.intent(AppIntent::MarkerClicked {
        site_id: SiteId::from("B"),
    });
    assert!(h.state.selection.active_site_id.is_none());
}

#[test]
fn test_teardown_releases_everything_and_is_idempotent() {
    let mut h = Harness::ready_immediate();
    h.click_marker(&a());

    h.intent(AppIntent::TeardownRequested);

    assert_eq!(h.state.lifecycle, MapLifecycle::Unmounted);
    assert!(h.state.overlays.is_empty());
    assert!(matches!(h.state.popup, PopupState::Empty));
    assert!(h.state.dismiss_listener.is_none());
    assert!(h.state.selection.active_site_id.is_none());
    assert!(h.state.chrome.legend.is_none());
    assert_eq!(h.engine().marker_count(), 0);
    assert_eq!(h.engine().popup_count(), 0);
    assert_eq!(h.engine().listener_count(), 0);
    assert_eq!(h.engine().control_count(), 0);
    assert!(!h.engine().is_mounted());

    h.engine_mut().clear_journal();
    h.intent(AppIntent::TeardownRequested);
    assert!(h.engine().journal().is_empty());
    assert_eq!(
        h.state
            .command_log
            .count_matching(|c| *c == AppCommand::Teardown),
        2
    );
}

#[test]
fn test_teardown_mid_animation_suppresses_pending_popup() {
    let mut h = Harness::ready();
    h.click_marker(&a());
    h.advance_ms(40);
    assert!(h.engine().is_animating());
    assert_eq!(h.engine().pending_timer_count(), 1);

    h.intent(AppIntent::TeardownRequested);
    assert!(!h.engine().is_animating());

    h.advance_ms(500);

    assert_eq!(h.engine().popup_count(), 0);
    assert!(matches!(h.state.popup, PopupState::Empty));
    assert_eq!(
        h.state
            .command_log
            .count_matching(|c| matches!(c, AppCommand::AttachScheduledPopup { .. })),
        1
    );
}

#[test]
fn test_remount_after_teardown_rebuilds_overlays() {
    let mut h = Harness::ready();
    h.intent(AppIntent::TeardownRequested);

    h.intent(AppIntent::MountRequested);

    assert_eq!(h.state.lifecycle, MapLifecycle::Ready);
    assert_eq!(h.engine().marker_count(), 2);
    assert_eq!(h.state.overlays.len(), 2);
}

#[test]
fn test_custom_layer_filter_from_options() {
    let mut options = MapOptions::default();
    options.hidden_layer_pattern = "^water$".to_string();
    options.hide_symbol_layers = false;
    let engine = HeadlessEngine::with_layers(vec![
        StyleLayer::new("water", LayerKind::Fill),
        StyleLayer::new("poi_museum", LayerKind::Symbol),
    ]);
    let mut h = Harness::new(two_site_catalog(), options, engine);

    h.intent(AppIntent::MountRequested);

    let hidden: Vec<&str> = h
        .engine()
        .layers()
        .iter()
        .filter(|l| !l.visible)
        .map(|l| l.id.as_str())
        .collect();
    assert_eq!(hidden, vec!["water"]);
}

#[test]
fn test_theme_registered_at_startup_is_not_registered_again() {
    let mut engine = HeadlessEngine::new();
    assert!(theme::ensure_registered(&mut engine));
    assert!(!theme::ensure_registered(&mut engine));
    let mut h = Harness::new(two_site_catalog(), MapOptions::default(), engine);

    h.intent(AppIntent::MountRequested);
    h.intent(AppIntent::TeardownRequested);
    h.intent(AppIntent::MountRequested);

    assert_eq!(h.state.lifecycle, MapLifecycle::Ready);
    assert!(h.engine().has_stylesheet(THEME_STYLESHEET_ID));
    assert_eq!(
        h.journal_count(|op| matches!(op, EngineOp::StylesheetRegistered(_))),
        1
    );
}
