//! Gemeinsame Test-Hilfen für die Controller-Flow-Tests.

mod lifecycle;
mod likes_and_upload;
mod race_guard;
mod selection;

use cultural_site_map::engine::{ElementId, MarkerId};
use cultural_site_map::overlay::NodeAction;
use cultural_site_map::{
    AppController, AppIntent, AppState, EngineOp, GeoBounds, HeadlessEngine, MapLifecycle,
    MapOptions, SiteCatalog, SiteId,
};
use std::time::Duration;

/// Zwei Sites wie im Szenario: A@(27.138, 38.419), B@(27.140, 38.418).
pub const TWO_SITES_JSON: &str = r#"[
    {"id": "A", "name": "Site A", "type": "landmark", "coordinates": [27.138, 38.419],
     "description": "Erste Site", "image": "https://example.invalid/a.jpg"},
    {"id": "B", "name": "Site B", "type": "cafe", "coordinates": [27.140, 38.418],
     "description": "Zweite Site", "image": "https://example.invalid/b.jpg", "initialLikes": 5}
]"#;

pub fn two_site_catalog() -> SiteCatalog {
    let bounds = GeoBounds::from_corners(cultural_site_map::shared::MAX_BOUNDS);
    SiteCatalog::from_json(TWO_SITES_JSON, &bounds).expect("Test-Katalog sollte parsebar sein")
}

pub fn a() -> SiteId {
    SiteId::from("A")
}

pub fn b() -> SiteId {
    SiteId::from("B")
}

/// Controller + State über einer Headless-Engine.
pub struct Harness {
    pub state: AppState,
    pub controller: AppController<HeadlessEngine>,
}

impl Harness {
    pub fn new(catalog: SiteCatalog, options: MapOptions, engine: HeadlessEngine) -> Self {
        Self {
            state: AppState::with_catalog(catalog, options),
            controller: AppController::new(engine),
        }
    }

    /// Gemountete, bereite Karte mit den Sites A und B.
    pub fn ready() -> Self {
        Self::ready_with(MapOptions::default())
    }

    pub fn ready_with(options: MapOptions) -> Self {
        let mut h = Self::new(two_site_catalog(), options, HeadlessEngine::new());
        h.intent(AppIntent::MountRequested);
        assert_eq!(h.state.lifecycle, MapLifecycle::Ready);
        h.engine_mut().clear_journal();
        h
    }

    /// Bereit und ohne Popup-Verzögerung.
    pub fn ready_immediate() -> Self {
        let mut options = MapOptions::default();
        options.popup_attach_delay_ms = 0;
        Self::ready_with(options)
    }

    /// Verarbeitet einen Intent und danach alle Engine-Events.
    pub fn intent(&mut self, intent: AppIntent) {
        self.controller
            .handle_intent(&mut self.state, intent)
            .expect("Intent sollte ohne Fehler durchlaufen");
        self.pump();
    }

    pub fn pump(&mut self) {
        self.controller
            .pump_engine_events(&mut self.state)
            .expect("Engine-Events sollten ohne Fehler verarbeitet werden");
    }

    pub fn engine(&self) -> &HeadlessEngine {
        self.controller.engine()
    }

    pub fn engine_mut(&mut self) -> &mut HeadlessEngine {
        self.controller.engine_mut()
    }

    /// Element, das die Aktion trägt (muss existieren).
    pub fn target(&self, action: NodeAction) -> ElementId {
        self.engine()
            .find_action_target(&action)
            .unwrap_or_else(|| panic!("Kein Element für {action:?}"))
    }

    /// Klick über die Engine (inkl. Bubbling und Map-Click).
    pub fn click(&mut self, target: ElementId) {
        assert!(self.engine_mut().click(target), "Klick-Ziel existiert nicht");
        self.pump();
    }

    pub fn click_marker(&mut self, site_id: &SiteId) {
        let target = self.target(NodeAction::ActivateSite(site_id.clone()));
        self.click(target);
    }

    pub fn click_canvas(&mut self) {
        let position = cultural_site_map::LngLat::new(27.0, 38.3);
        self.engine_mut().click_canvas(position);
        self.pump();
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.engine_mut().advance(Duration::from_millis(ms));
        self.pump();
    }

    pub fn marker_of(&self, site_id: &SiteId) -> MarkerId {
        self.state
            .overlays
            .get(site_id)
            .map(|h| h.marker)
            .expect("Site sollte ein Overlay-Handle haben")
    }

    pub fn marker_has_class(&self, site_id: &SiteId, class: &str) -> bool {
        self.engine()
            .marker_element(self.marker_of(site_id))
            .map(|el| el.has_class(class))
            .unwrap_or(false)
    }

    /// Position der ersten Journal-Operation, die `pred` erfüllt.
    pub fn journal_index(&self, pred: impl Fn(&EngineOp) -> bool) -> Option<usize> {
        self.engine().journal().iter().position(pred)
    }

    pub fn journal_count(&self, pred: impl Fn(&EngineOp) -> bool) -> usize {
        self.engine().journal().iter().filter(|op| pred(op)).count()
    }
}
