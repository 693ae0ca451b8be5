use super::{a, b, Harness};
use approx::assert_relative_eq;
use cultural_site_map::app::use_cases::popup::race_guard;
use cultural_site_map::shared::theme::ACTIVE_CLASS;
use cultural_site_map::{AppCommand, AppIntent, EngineOp, PopupState};

#[test]
fn test_switch_before_timer_suppresses_stale_popup() {
    let mut h = Harness::ready();

    h.click_marker(&a());
    let first_generation = h.state.selection.generation;
    h.advance_ms(50);
    h.click_marker(&b());

    assert!(h.marker_has_class(&b(), ACTIVE_CLASS));
    assert!(!h.marker_has_class(&a(), ACTIVE_CLASS));
    let target = h.engine().camera_target().expect("Kamerafahrt zu B");
    assert_relative_eq!(target.center.x, 27.140);
    assert_relative_eq!(target.center.y, 38.418);

    // A's Timer fällt bei t=100, B's bei t=150
    h.advance_ms(50);
    assert_eq!(h.engine().popup_count(), 0);
    assert!(matches!(
        &h.state.popup,
        PopupState::Scheduled { instance, .. } if instance.site_id == b()
    ));
    assert_eq!(
        h.state.command_log.count_matching(|c| matches!(
            c,
            AppCommand::AttachScheduledPopup { site_id, generation }
                if *site_id == a() && *generation == first_generation
        )),
        1,
        "A's Timer sollte gefeuert und verworfen worden sein"
    );

    h.advance_ms(50);
    assert_eq!(h.state.popup.attached_site(), Some(&b()));
    assert_eq!(h.engine().popup_count(), 1);
    assert_eq!(h.journal_count(|op| matches!(op, EngineOp::PopupAdded(_))), 1);

    let popup = h.engine().popup_ids()[0];
    let position = h.engine().popup_position(popup).expect("Popup-Position");
    assert_relative_eq!(position.x, 27.140);
    assert_relative_eq!(position.y, 38.418);
}

#[test]
fn test_reselect_same_site_invalidates_older_timer() {
    let mut h = Harness::ready();

    // A an, A aus, A an: nur der letzte Timer darf anhängen
    h.click_marker(&a());
    h.click_marker(&a());
    h.click_marker(&a());
    assert_eq!(h.engine().pending_timer_count(), 2);

    h.advance_ms(100);

    assert_eq!(h.engine().popup_count(), 1);
    assert_eq!(h.state.popup.attached_site(), Some(&a()));
}

#[test]
fn test_timer_after_dismiss_does_not_attach() {
    let mut h = Harness::ready();

    h.click_marker(&a());
    h.click_canvas();
    assert!(h.state.selection.active_site_id.is_none());

    h.advance_ms(200);

    assert_eq!(h.engine().popup_count(), 0);
    assert!(matches!(h.state.popup, PopupState::Empty));
}

#[test]
fn test_guard_rejects_mismatched_generation_and_site() {
    let mut h = Harness::ready();
    h.click_marker(&a());
    let generation = h.state.selection.generation;

    assert!(race_guard(&h.state, &a(), generation).is_ok());
    assert!(race_guard(&h.state, &a(), generation - 1).is_err());
    assert!(race_guard(&h.state, &b(), generation).is_err());

    let violation = race_guard(&h.state, &b(), generation).unwrap_err();
    assert_eq!(violation.site_id, b());
    assert_eq!(violation.generation, generation);
}

#[test]
fn test_forged_timer_intent_is_ignored() {
    let mut h = Harness::ready_immediate();
    h.click_marker(&a());
    let generation = h.state.selection.generation;

    // Popup hängt schon; ein doppelter Timer darf kein zweites anhängen
    h.intent(AppIntent::PopupAttachTimerElapsed {
        site_id: a(),
        generation,
    });

    assert_eq!(h.engine().popup_count(), 1);
    assert!(h.state.popup.is_attached());
}
