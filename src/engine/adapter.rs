//! Dünne Fassade über der Karten-Engine.
//!
//! Kapselt die Anpassungslogik, die zur Anwendung gehört: begrenztes Mounten,
//! idempotentes Ausblenden der Default-Layer und den Marker-Hit-Test.

use super::{
    ControlCorner, ControlId, ElementId, EngineError, EngineEvent, LayerKind, ListenerId,
    MapEngine, MarkerId, MountConfig, PopupId, PopupOptions, StyleLayer, TimerToken,
};
use crate::core::{CameraTarget, LngLat};
use crate::errors::EngineInitError;
use crate::overlay::VisualNode;
use crate::shared::options::HIDDEN_LAYER_PATTERN;
use crate::shared::{theme, MapOptions};
use regex::Regex;
use std::time::Duration;

/// Entscheidet, welche Default-Layer der Engine ausgeblendet werden.
#[derive(Debug, Clone)]
pub struct LayerFilter {
    /// `None` = Default-Verhalten (ID enthält "poi", ohne Groß/Klein)
    pattern: Option<Regex>,
    hide_symbol_layers: bool,
}

impl Default for LayerFilter {
    fn default() -> Self {
        Self::new(HIDDEN_LAYER_PATTERN, true)
    }
}

impl LayerFilter {
    /// Erstellt einen Filter; ungültige Muster fallen auf das Default-Muster zurück.
    pub fn new(pattern: &str, hide_symbol_layers: bool) -> Self {
        let pattern = match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!(
                    "Ungültiges Layer-Muster '{}', verwende '{}': {}",
                    pattern,
                    HIDDEN_LAYER_PATTERN,
                    e
                );
                None
            }
        };
        Self {
            pattern,
            hide_symbol_layers,
        }
    }

    pub fn from_options(options: &MapOptions) -> Self {
        Self::new(&options.hidden_layer_pattern, options.hide_symbol_layers)
    }

    /// POI-Layer (per ID) und optional alle Symbol-Layer werden versteckt.
    pub fn should_hide(&self, layer: &StyleLayer) -> bool {
        let id_matches = match &self.pattern {
            Some(re) => re.is_match(&layer.id),
            None => layer.id.to_lowercase().contains("poi"),
        };
        id_matches || (self.hide_symbol_layers && layer.kind == LayerKind::Symbol)
    }
}

/// Fassade, über die die Anwendung mit der Engine spricht.
pub struct MapAdapter<E: MapEngine> {
    engine: E,
    layer_filter: LayerFilter,
}

impl<E: MapEngine> MapAdapter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            layer_filter: LayerFilter::default(),
        }
    }

    /// Mountet die Karte begrenzt auf den Kartenbereich der Optionen.
    ///
    /// Registriert vorher das Theme-Stylesheet (einmalig pro Engine).
    pub fn mount(&mut self, options: &MapOptions) -> Result<(), EngineInitError> {
        theme::ensure_registered(&mut self.engine);
        self.layer_filter = LayerFilter::from_options(options);

        let config = MountConfig {
            style_url: options.style_url.clone(),
            center: LngLat::from(options.default_center),
            zoom: options.default_zoom,
            max_bounds: options.bounds(),
            navigation_control: options.show_navigation_control,
        };
        self.engine.mount(&config).map_err(EngineInitError::Mount)?;
        log::info!("Karte gemountet ({})", options.style_url);
        Ok(())
    }

    /// Gibt alle Engine-Ressourcen frei (mehrfach aufrufbar).
    pub fn unmount(&mut self) {
        self.engine.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.engine.is_mounted()
    }

    /// Blendet alle passenden, noch sichtbaren Default-Layer aus.
    ///
    /// Idempotent; eine Engine ohne Layer ergibt 0.
    pub fn hide_default_layers(&mut self) -> usize {
        let mut hidden = 0;
        for layer in self.engine.style_layers() {
            if !layer.visible || !self.layer_filter.should_hide(&layer) {
                continue;
            }
            match self.engine.set_layer_visible(&layer.id, false) {
                Ok(()) => hidden += 1,
                Err(e) => log::warn!("Layer '{}' nicht ausblendbar: {}", layer.id, e),
            }
        }
        if hidden > 0 {
            log::info!("{} Default-Layer ausgeblendet", hidden);
        }
        hidden
    }

    pub fn ease_camera(&mut self, target: &CameraTarget) {
        self.engine.ease_to(target);
    }

    pub fn attach_marker(
        &mut self,
        element: VisualNode,
        position: LngLat,
    ) -> Result<MarkerId, EngineError> {
        self.engine.add_marker(element, position)
    }

    pub fn detach_marker(&mut self, id: MarkerId) {
        self.engine.remove_marker(id);
    }

    pub fn set_marker_class(&mut self, id: MarkerId, class: &str, enabled: bool) {
        self.engine.set_marker_class(id, class, enabled);
    }

    pub fn attach_popup(
        &mut self,
        content: VisualNode,
        position: LngLat,
        options: &PopupOptions,
    ) -> Result<PopupId, EngineError> {
        self.engine.add_popup(content, position, options)
    }

    /// Ersetzt den Inhalt eines angehängten Popups ohne Re-Attach.
    pub fn replace_popup_content(&mut self, id: PopupId, content: VisualNode) {
        self.engine.set_popup_content(id, content);
    }

    pub fn detach_popup(&mut self, id: PopupId) {
        self.engine.remove_popup(id);
    }

    pub fn attach_control(
        &mut self,
        element: VisualNode,
        corner: ControlCorner,
    ) -> Result<ControlId, EngineError> {
        self.engine.add_control(element, corner)
    }

    pub fn detach_control(&mut self, id: ControlId) {
        self.engine.remove_control(id);
    }

    pub fn register_click_listener(&mut self) -> ListenerId {
        self.engine.on_click()
    }

    pub fn unregister_click_listener(&mut self, id: ListenerId) {
        self.engine.off_click(id);
    }

    pub fn schedule(&mut self, delay: Duration, token: TimerToken) {
        self.engine.set_timeout(delay, token);
    }

    /// Hit-Test per Vorfahren-Suche; `None` (freie Fläche) liegt immer außerhalb.
    pub fn is_inside_marker(&self, target: Option<ElementId>) -> bool {
        target
            .and_then(|t| self.engine.closest(t, theme::MARKER_CLASS))
            .is_some()
    }

    pub fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.engine.poll_events()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
