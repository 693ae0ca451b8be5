//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};
use crate::engine::{MapAdapter, MapEngine};

/// Obergrenze für Event-Runden pro `pump_engine_events`-Aufruf.
const MAX_PUMP_ROUNDS: usize = 64;

/// Orchestriert Engine-Events, Host-Eingaben und Use-Cases auf den AppState.
///
/// Besitzt die Karten-Fassade; der `AppState` wird wie gewohnt pro Aufruf
/// übergeben.
pub struct AppController<E: MapEngine> {
    map: MapAdapter<E>,
}

impl<E: MapEngine> AppController<E> {
    /// Erstellt einen neuen Controller über der gegebenen Engine.
    pub fn new(engine: E) -> Self {
        Self {
            map: MapAdapter::new(engine),
        }
    }

    pub fn map(&self) -> &MapAdapter<E> {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapAdapter<E> {
        &mut self.map
    }

    pub fn engine(&self) -> &E {
        self.map.engine()
    }

    pub fn engine_mut(&mut self) -> &mut E {
        self.map.engine_mut()
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;
        let map = &mut self.map;

        match command {
            // === Lebenszyklus ===
            AppCommand::MountMap => handlers::lifecycle::mount(state, map)?,
            AppCommand::HideDefaultLayers => handlers::lifecycle::hide_default_layers(map),
            AppCommand::InitializeOverlays => handlers::lifecycle::initialize_overlays(state, map)?,
            AppCommand::Teardown => handlers::lifecycle::teardown(state, map),

            // === Selektion ===
            AppCommand::ToggleSelection { site_id } => {
                handlers::selection::toggle(state, map, site_id)?
            }
            AppCommand::ClearSelection => handlers::selection::clear(state, map)?,
            AppCommand::SetMarkerHover { site_id, hovered } => {
                handlers::selection::set_hover(state, map, &site_id, hovered)
            }
            AppCommand::DismissOnBackgroundClick { target } => {
                handlers::selection::dismiss_on_background_click(state, map, target)?
            }

            // === Popup ===
            AppCommand::AttachScheduledPopup {
                site_id,
                generation,
            } => handlers::popup::attach_scheduled(state, map, &site_id, generation)?,
            AppCommand::ToggleLike { site_id } => {
                handlers::popup::toggle_like(state, map, &site_id)
            }

            // === Upload ===
            AppCommand::OpenUploadPicker { site_id } => {
                handlers::upload::open_picker(state, site_id)
            }
            AppCommand::PrepareUpload { site_id, blob } => {
                handlers::upload::prepare(state, site_id, blob)
            }
            AppCommand::ApplyUploadResult { site_id, result } => {
                handlers::upload::apply_result(state, map, site_id, result)
            }
            AppCommand::CloseUploadPicker => handlers::upload::close_picker(state),
            AppCommand::DismissNotice => handlers::upload::dismiss_notice(state),
        }

        Ok(())
    }

    /// Holt aufgelaufene Engine-Events ab und verarbeitet sie als Intents.
    ///
    /// Läuft, bis die Engine keine neuen Events mehr liefert. Gibt die Anzahl
    /// verarbeiteter Events zurück.
    pub fn pump_engine_events(&mut self, state: &mut AppState) -> anyhow::Result<usize> {
        let mut processed = 0;
        for _ in 0..MAX_PUMP_ROUNDS {
            let events = self.map.poll_events();
            if events.is_empty() {
                return Ok(processed);
            }
            for event in events {
                processed += 1;
                if let Some(intent) = AppIntent::from_engine_event(event) {
                    self.handle_intent(state, intent)?;
                }
            }
        }
        log::warn!(
            "Event-Verarbeitung nach {} Runden abgebrochen",
            MAX_PUMP_ROUNDS
        );
        Ok(processed)
    }
}
