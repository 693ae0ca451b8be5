use super::{a, b, Harness};
use approx::assert_relative_eq;
use cultural_site_map::engine::TimerToken;
use cultural_site_map::overlay::NodeAction;
use cultural_site_map::shared::theme::{ACTIVE_CLASS, HOVERED_CLASS};
use cultural_site_map::{
    AppCommand, AppIntent, EngineOp, MapEngine, PopupState, SiteId, VisualState,
};

fn assert_exclusive_active(h: &Harness) {
    assert!(h.state.active_handle_count() <= 1);
    for handle in h.state.overlays.values() {
        let should_be_active = h.state.selection.is_active(&handle.site_id);
        assert_eq!(
            handle.visual_state == VisualState::Active,
            should_be_active,
            "Handle '{}' passt nicht zur Selektion",
            handle.site_id
        );
        assert_eq!(h.marker_has_class(&handle.site_id, ACTIVE_CLASS), should_be_active);
    }
}

#[test]
fn test_initialize_builds_one_handle_per_site_and_no_popup() {
    let h = Harness::ready();

    assert_eq!(h.state.overlays.len(), 2);
    assert_eq!(h.engine().marker_count(), 2);
    assert_eq!(h.engine().popup_count(), 0);
    assert!(matches!(h.state.popup, PopupState::Empty));
    assert!(h.state.dismiss_listener.is_none());
    assert!(h
        .state
        .overlays
        .values()
        .all(|handle| handle.visual_state == VisualState::Idle));
}

#[test]
fn test_select_a_eases_camera_attaches_popup_and_registers_listener() {
    let mut h = Harness::ready();

    h.click_marker(&a());

    let last = h
        .state
        .command_log
        .entries()
        .iter()
        .rev()
        .find(|c| matches!(c, AppCommand::ToggleSelection { .. }))
        .expect("ToggleSelection sollte geloggt sein");
    assert_eq!(last, &AppCommand::ToggleSelection { site_id: a() });

    let target = h.engine().camera_target().expect("Kamerafahrt gestartet");
    assert_relative_eq!(target.center.x, 27.138);
    assert_relative_eq!(target.center.y, 38.419);
    assert_relative_eq!(target.zoom, 15.0);
    assert_eq!(target.duration.as_millis(), 1200);

    assert!(matches!(h.state.popup, PopupState::Scheduled { .. }));
    assert_eq!(h.engine().popup_count(), 0);
    assert_eq!(h.engine().listener_count(), 1);
    assert_exclusive_active(&h);

    h.advance_ms(100);

    assert_eq!(h.state.popup.attached_site(), Some(&a()));
    assert_eq!(h.engine().popup_count(), 1);
    let popup = h.engine().popup_ids()[0];
    let text = h.engine().popup_text(popup).expect("Popup-Text");
    assert!(text.contains("Site A"));
    assert!(text.contains("İzmir, Turkey"));
}

#[test]
fn test_popup_attach_happens_after_camera_start() {
    let mut h = Harness::ready();

    h.click_marker(&a());
    h.advance_ms(100);

    let eased = h
        .journal_index(|op| matches!(op, EngineOp::CameraEased(_)))
        .expect("Kamera gestartet");
    let attached = h
        .journal_index(|op| matches!(op, EngineOp::PopupAdded(_)))
        .expect("Popup angehängt");
    assert!(eased < attached);
}

#[test]
fn test_immediate_attach_also_follows_camera_start() {
    let mut h = Harness::ready_immediate();

    h.click_marker(&b());

    assert_eq!(h.state.popup.attached_site(), Some(&b()));
    assert_eq!(h.engine().pending_timer_count(), 0);
    let eased = h
        .journal_index(|op| matches!(op, EngineOp::CameraEased(_)))
        .expect("Kamera gestartet");
    let attached = h
        .journal_index(|op| matches!(op, EngineOp::PopupAdded(_)))
        .expect("Popup angehängt");
    assert!(eased < attached);
}

#[test]
fn test_toggling_same_site_twice_clears_everything() {
    let mut h = Harness::ready();

    h.click_marker(&a());
    h.advance_ms(100);
    h.click_marker(&a());

    assert!(h.state.selection.active_site_id.is_none());
    assert!(matches!(h.state.popup, PopupState::Empty));
    assert_eq!(h.engine().popup_count(), 0);
    assert!(h.state.dismiss_listener.is_none());
    assert_eq!(h.engine().listener_count(), 0);

    let target = h.engine().camera_target().expect("Kamerafahrt zurück");
    assert_relative_eq!(target.zoom, 11.0);
    assert_relative_eq!(target.center.x, 27.135);
    assert_relative_eq!(target.center.y, 38.423);
    assert_exclusive_active(&h);
}

#[test]
fn test_switching_sites_keeps_exactly_one_active_and_one_listener() {
    let mut h = Harness::ready_immediate();
    let sequence = [a(), b(), b(), a(), b(), a(), a()];

    for site in &sequence {
        h.click_marker(site);
        assert_exclusive_active(&h);
        assert!(h.engine().popup_count() <= 1);
        assert!(h.engine().listener_count() <= 1);
        assert_eq!(
            h.engine().listener_count() == 1,
            h.state.selection.active_site_id.is_some()
        );
    }

    let added = h.journal_count(|op| matches!(op, EngineOp::ListenerAdded(_)));
    let removed = h.journal_count(|op| matches!(op, EngineOp::ListenerRemoved(_)));
    assert_eq!(added, removed + h.engine().listener_count());
}

#[test]
fn test_exclusive_active_across_timers_background_and_close() {
    let mut h = Harness::ready();

    h.click_marker(&a());
    assert_exclusive_active(&h);
    h.advance_ms(40);
    assert_exclusive_active(&h);

    // Wechsel vor dem Attach von A
    h.click_marker(&b());
    assert_exclusive_active(&h);
    h.advance_ms(100);
    assert_exclusive_active(&h);
    assert_eq!(h.state.popup.attached_site(), Some(&b()));

    h.click_canvas();
    assert_exclusive_active(&h);
    assert!(h.state.selection.active_site_id.is_none());

    h.click_marker(&a());
    h.advance_ms(100);
    assert_exclusive_active(&h);
    let close = h.target(NodeAction::ClosePopup(a()));
    h.click(close);
    assert_exclusive_active(&h);

    // Hintergrund-Klick während der Timer noch läuft
    h.click_marker(&b());
    h.advance_ms(30);
    h.click_canvas();
    assert_exclusive_active(&h);
    h.advance_ms(200);
    assert_exclusive_active(&h);
    assert_eq!(h.engine().popup_count(), 0);

    h.click_marker(&a());
    h.click_marker(&b());
    h.click_marker(&b());
    h.advance_ms(200);
    assert_exclusive_active(&h);
    assert!(h.state.selection.active_site_id.is_none());
    assert_eq!(h.engine().popup_count(), 0);
    assert_eq!(h.engine().listener_count(), 0);
}

#[test]
fn test_reselecting_builds_fresh_popup_instance() {
    let mut h = Harness::ready_immediate();

    h.click_marker(&a());
    let first = h.state.popup.popup_id().expect("Popup angehängt");
    h.click_marker(&b());
    h.click_marker(&a());
    let second = h.state.popup.popup_id().expect("Popup angehängt");

    assert_ne!(first, second);
    assert!(h
        .engine()
        .journal()
        .contains(&EngineOp::PopupRemoved(first)));
}

#[test]
fn test_unknown_site_is_rejected_without_state_change() {
    let mut h = Harness::ready();
    h.click_marker(&a());
    let before = h.state.selection.clone();

    h.intent(AppIntent::MarkerClicked {
        site_id: SiteId::from("gibt-es-nicht"),
    });

    assert_eq!(h.state.selection, before);
}

#[test]
fn test_popup_close_clears_selection() {
    let mut h = Harness::ready_immediate();
    h.click_marker(&a());

    let close = h.target(NodeAction::ClosePopup(a()));
    h.click(close);

    assert!(h.state.selection.active_site_id.is_none());
    assert_eq!(h.engine().popup_count(), 0);
    assert_eq!(h.engine().listener_count(), 0);
}

#[test]
fn test_hover_sets_transient_state_but_not_on_active_marker() {
    let mut h = Harness::ready();

    h.intent(AppIntent::MarkerHoverChanged {
        site_id: a(),
        hovered: true,
    });
    assert_eq!(h.state.overlays[&a()].visual_state, VisualState::Hovered);
    assert!(h.marker_has_class(&a(), HOVERED_CLASS));

    h.click_marker(&a());
    assert_eq!(h.state.overlays[&a()].visual_state, VisualState::Active);
    assert!(!h.marker_has_class(&a(), HOVERED_CLASS));

    h.intent(AppIntent::MarkerHoverChanged {
        site_id: a(),
        hovered: true,
    });
    assert_eq!(h.state.overlays[&a()].visual_state, VisualState::Active);

    h.intent(AppIntent::MarkerHoverChanged {
        site_id: b(),
        hovered: true,
    });
    h.intent(AppIntent::MarkerHoverChanged {
        site_id: b(),
        hovered: false,
    });
    assert_eq!(h.state.overlays[&b()].visual_state, VisualState::Idle);
    assert!(!h.marker_has_class(&b(), HOVERED_CLASS));
}

#[test]
fn test_camera_settles_on_site_after_animation() {
    let mut h = Harness::ready();

    h.click_marker(&a());
    h.advance_ms(1200);

    let view = h.engine().camera();
    assert_relative_eq!(view.center.x, 27.138, epsilon = 1e-9);
    assert_relative_eq!(view.center.y, 38.419, epsilon = 1e-9);
    assert_relative_eq!(view.zoom, 15.0, epsilon = 1e-9);
    assert!(!h.engine().is_animating());
}

#[test]
fn test_timer_token_carries_site_and_generation() {
    let mut h = Harness::ready();

    h.click_marker(&a());

    let generation = h.state.selection.generation;
    assert!(h.engine().journal().contains(&EngineOp::TimerScheduled(
        TimerToken::AttachPopup {
            site_id: a(),
            generation,
        }
    )));
    assert_eq!(h.engine().pending_timer_count(), 1);
}
