//! Mapping von Engine-/Host-Intents auf mutierende App-Commands.

use super::{AppCommand, AppIntent, AppState};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::MountRequested => vec![AppCommand::MountMap],
        AppIntent::MapStyleLoaded => vec![
            AppCommand::HideDefaultLayers,
            AppCommand::InitializeOverlays,
        ],
        AppIntent::MarkerClicked { site_id } => vec![AppCommand::ToggleSelection { site_id }],
        AppIntent::MarkerHoverChanged { site_id, hovered } => {
            vec![AppCommand::SetMarkerHover { site_id, hovered }]
        }
        // Schließen hebt immer auf, es schaltet nie auf eine andere Site um
        AppIntent::PopupCloseClicked { .. } => vec![AppCommand::ClearSelection],
        AppIntent::MapClicked { listener, target } => {
            if state.dismiss_listener == Some(listener) {
                vec![AppCommand::DismissOnBackgroundClick { target }]
            } else {
                log::debug!("Klick an veralteten Listener {:?} ignoriert", listener);
                vec![]
            }
        }
        AppIntent::PopupAttachTimerElapsed {
            site_id,
            generation,
        } => vec![AppCommand::AttachScheduledPopup {
            site_id,
            generation,
        }],
        AppIntent::LikeToggleClicked { site_id } => vec![AppCommand::ToggleLike { site_id }],
        AppIntent::UploadRequested { site_id } => vec![AppCommand::OpenUploadPicker { site_id }],
        AppIntent::ImageFileChosen { site_id, blob } => {
            vec![AppCommand::PrepareUpload { site_id, blob }]
        }
        AppIntent::ImageUploadFinished { site_id, result } => {
            vec![AppCommand::ApplyUploadResult { site_id, result }]
        }
        AppIntent::UploadCancelled => vec![AppCommand::CloseUploadPicker],
        AppIntent::NoticeDismissed => vec![AppCommand::DismissNotice],
        AppIntent::TeardownRequested => vec![AppCommand::Teardown],
    }
}
