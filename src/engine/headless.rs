//! In-Memory-Karten-Engine mit virtueller Uhr.
//!
//! Bildet das beobachtbare Verhalten einer Browser-Karten-Engine nach:
//! Knotenbäume werden in eine flache Szene übernommen, Klicks blubbern vom
//! Target zur Wurzel, Timer laufen auf einer manuell vorgestellten Uhr.
//! Timer gehören (wie `setTimeout` im Browser) nicht zur Karte und
//! überleben deshalb auch ein `unmount()`.

use super::{
    ControlCorner, ControlId, ElementId, EngineError, EngineEvent, LayerKind, ListenerId, MapClick,
    MapEngine, MarkerId, MountConfig, PopupId, PopupOptions, StyleLayer, TimerToken,
};
use crate::core::{CameraTarget, CameraView, GeoBounds, LngLat};
use crate::overlay::{NodeAction, Tag, VisualNode};
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::time::Duration;

/// Protokollierte Engine-Operation (für Reihenfolge-Prüfungen).
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOp {
    Mounted,
    Unmounted,
    LayerHidden(String),
    StylesheetRegistered(String),
    CameraEased(CameraTarget),
    MarkerAdded(MarkerId),
    MarkerRemoved(MarkerId),
    PopupAdded(PopupId),
    PopupContentReplaced(PopupId),
    PopupRemoved(PopupId),
    ControlAdded(ControlId),
    ControlRemoved(ControlId),
    ListenerAdded(ListenerId),
    ListenerRemoved(ListenerId),
    TimerScheduled(TimerToken),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    Marker,
    Popup,
    Control,
}

/// Element der Szene (materialisierter `VisualNode`).
#[derive(Debug, Clone)]
pub struct SceneElement {
    pub tag: Tag,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    pub classes: Vec<String>,
    pub attributes: IndexMap<String, String>,
    pub text: Option<String>,
    pub action: Option<NodeAction>,
    pub stop_propagation: bool,
    surface: Surface,
    anchor: Option<LngLat>,
}

impl SceneElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

struct MarkerEntry {
    root: ElementId,
}

struct PopupEntry {
    root: ElementId,
    position: LngLat,
    #[allow(dead_code)]
    options: PopupOptions,
}

struct ControlEntry {
    root: ElementId,
    #[allow(dead_code)]
    corner: ControlCorner,
}

struct PendingTimer {
    due_ms: u64,
    seq: u64,
    token: TimerToken,
}

struct CameraAnimation {
    from: CameraView,
    target: CameraTarget,
    started_ms: u64,
}

/// Headless-Engine für CLI, Tests und Benchmarks.
pub struct HeadlessEngine {
    mounted: bool,
    mount_failure: Option<String>,
    auto_style_load: bool,
    max_bounds: Option<GeoBounds>,
    style_template: Vec<StyleLayer>,
    layers: Vec<StyleLayer>,
    stylesheets: IndexMap<String, String>,
    navigation_control: bool,
    clock_ms: u64,
    camera: CameraView,
    animation: Option<CameraAnimation>,
    last_target: Option<CameraTarget>,
    elements: IndexMap<ElementId, SceneElement>,
    markers: IndexMap<MarkerId, MarkerEntry>,
    popups: IndexMap<PopupId, PopupEntry>,
    controls: IndexMap<ControlId, ControlEntry>,
    listeners: Vec<ListenerId>,
    timers: Vec<PendingTimer>,
    events: VecDeque<EngineEvent>,
    journal: Vec<EngineOp>,
    next_id: u64,
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessEngine {
    /// Engine mit einem typischen Straßenkarten-Style.
    pub fn new() -> Self {
        Self::with_layers(vec![
            StyleLayer::new("background", LayerKind::Background),
            StyleLayer::new("water", LayerKind::Fill),
            StyleLayer::new("building", LayerKind::Fill),
            StyleLayer::new("road_primary", LayerKind::Line),
            StyleLayer::new("POI_transit", LayerKind::Line),
            StyleLayer::new("poi_restaurant", LayerKind::Symbol),
            StyleLayer::new("place_label_city", LayerKind::Symbol),
            StyleLayer::new("road_label", LayerKind::Symbol),
        ])
    }

    /// Engine, deren Style genau diese Layer mitbringt.
    pub fn with_layers(layers: Vec<StyleLayer>) -> Self {
        Self {
            mounted: false,
            mount_failure: None,
            auto_style_load: true,
            max_bounds: None,
            style_template: layers,
            layers: Vec::new(),
            stylesheets: IndexMap::new(),
            navigation_control: false,
            clock_ms: 0,
            camera: CameraView {
                center: LngLat::ZERO,
                zoom: 0.0,
            },
            animation: None,
            last_target: None,
            elements: IndexMap::new(),
            markers: IndexMap::new(),
            popups: IndexMap::new(),
            controls: IndexMap::new(),
            listeners: Vec::new(),
            timers: Vec::new(),
            events: VecDeque::new(),
            journal: Vec::new(),
            next_id: 1,
        }
    }

    /// Jeder Mount-Versuch schlägt mit dieser Meldung fehl.
    pub fn failing_mount(mut self, message: &str) -> Self {
        self.mount_failure = Some(message.to_string());
        self
    }

    /// `StyleLoaded` wird erst über `emit_style_loaded()` ausgelöst.
    pub fn deferred_style_load(mut self) -> Self {
        self.auto_style_load = false;
        self
    }

    /// Signalisiert, dass der Style fertig geladen ist.
    pub fn emit_style_loaded(&mut self) {
        if self.mounted {
            self.events.push_back(EngineEvent::StyleLoaded);
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ── Uhr ─────────────────────────────────────────────────────────

    /// Aktuelle virtuelle Zeit.
    pub fn now(&self) -> Duration {
        Duration::from_millis(self.clock_ms)
    }

    /// Stellt die Uhr vor; fällige Timer feuern in Planungsreihenfolge.
    pub fn advance(&mut self, delta: Duration) {
        self.clock_ms += delta.as_millis() as u64;

        if let Some(anim) = &self.animation {
            let elapsed = Duration::from_millis(self.clock_ms - anim.started_ms);
            if anim.target.progress(elapsed) >= 1.0 {
                self.camera = anim.target.view();
                self.animation = None;
            }
        }

        let now = self.clock_ms;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.due_ms <= now);
        self.timers = pending;
        due.sort_by_key(|t| (t.due_ms, t.seq));
        self.events
            .extend(due.into_iter().map(|t| EngineEvent::TimerElapsed(t.token)));
    }

    // ── Eingaben ────────────────────────────────────────────────────

    /// Klick auf ein Element.
    ///
    /// Aktionen blubbern vom Target zur Wurzel und stoppen an Elementen mit
    /// `stop_propagation`. Danach bekommt jeder Karten-Listener ein
    /// `MapClick`, außer die Weitergabe wurde gestoppt oder das Element gehört
    /// zu einem Control-Panel. Gibt `false` für unbekannte Elemente zurück.
    pub fn click(&mut self, target: ElementId) -> bool {
        let Some(element) = self.elements.get(&target) else {
            return false;
        };
        let surface = element.surface;
        let position = element.anchor.unwrap_or(self.camera().center);

        let mut propagate = true;
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            let Some(el) = self.elements.get(&id) else {
                break;
            };
            if let Some(action) = &el.action {
                self.events
                    .push_back(EngineEvent::ElementAction(action.clone()));
            }
            if el.stop_propagation {
                propagate = false;
                break;
            }
            cursor = el.parent;
        }

        if propagate && surface != Surface::Control {
            self.dispatch_map_click(Some(target), position);
        }
        true
    }

    /// Klick auf die freie Kartenfläche.
    pub fn click_canvas(&mut self, position: LngLat) {
        self.dispatch_map_click(None, position);
    }

    /// Zeiger betritt/verlässt ein Element (nächste Aktion der Vorfahren).
    pub fn hover(&mut self, target: ElementId, entered: bool) -> bool {
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            let Some(el) = self.elements.get(&id) else {
                return false;
            };
            if let Some(action) = &el.action {
                self.events.push_back(EngineEvent::Hover {
                    action: action.clone(),
                    entered,
                });
                return true;
            }
            cursor = el.parent;
        }
        false
    }

    fn dispatch_map_click(&mut self, target: Option<ElementId>, position: LngLat) {
        if !self.mounted {
            return;
        }
        for &listener in &self.listeners {
            self.events.push_back(EngineEvent::MapClick(MapClick {
                listener,
                target,
                position,
            }));
        }
    }

    // ── Szene ───────────────────────────────────────────────────────

    fn insert_tree(
        &mut self,
        node: VisualNode,
        parent: Option<ElementId>,
        surface: Surface,
        anchor: Option<LngLat>,
    ) -> ElementId {
        let id = ElementId(self.next_id());
        let VisualNode {
            tag,
            classes,
            attributes,
            text,
            action,
            stop_propagation,
            children,
            ..
        } = node;

        self.elements.insert(
            id,
            SceneElement {
                tag,
                parent,
                children: Vec::new(),
                classes,
                attributes,
                text,
                action,
                stop_propagation,
                surface,
                anchor,
            },
        );

        let child_ids: Vec<ElementId> = children
            .into_iter()
            .map(|child| self.insert_tree(child, Some(id), surface, anchor))
            .collect();
        if let Some(el) = self.elements.get_mut(&id) {
            el.children = child_ids;
        }
        id
    }

    fn remove_tree(&mut self, root: ElementId) {
        if let Some(el) = self.elements.shift_remove(&root) {
            for child in el.children {
                self.remove_tree(child);
            }
        }
    }

    fn subtree_text(&self, root: ElementId) -> String {
        let mut out = String::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(el) = self.elements.get(&id) {
                if let Some(text) = &el.text {
                    out.push_str(text);
                }
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    // ── Abfragen ────────────────────────────────────────────────────

    /// Erstes Element, das die Aktion trägt.
    pub fn find_action_target(&self, action: &NodeAction) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|(_, el)| el.action.as_ref() == Some(action))
            .map(|(id, _)| *id)
    }

    /// Erstes Element innerhalb eines Popups, das die Klasse trägt.
    pub fn find_popup_element(&self, class: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|(_, el)| el.surface == Surface::Popup && el.has_class(class))
            .map(|(id, _)| *id)
    }

    /// Erstes Element innerhalb eines Control-Panels, das die Klasse trägt.
    pub fn find_control_element(&self, class: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|(_, el)| el.surface == Surface::Control && el.has_class(class))
            .map(|(id, _)| *id)
    }

    pub fn element(&self, id: ElementId) -> Option<&SceneElement> {
        self.elements.get(&id)
    }

    /// Wurzel-Element eines Markers.
    pub fn marker_element(&self, id: MarkerId) -> Option<&SceneElement> {
        self.markers
            .get(&id)
            .and_then(|m| self.elements.get(&m.root))
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn popup_ids(&self) -> Vec<PopupId> {
        self.popups.keys().copied().collect()
    }

    pub fn popup_count(&self) -> usize {
        self.popups.len()
    }

    /// Textinhalt eines Popups.
    pub fn popup_text(&self, id: PopupId) -> Option<String> {
        self.popups.get(&id).map(|p| self.subtree_text(p.root))
    }

    pub fn popup_position(&self, id: PopupId) -> Option<LngLat> {
        self.popups.get(&id).map(|p| p.position)
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    pub fn has_navigation_control(&self) -> bool {
        self.navigation_control
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn layers(&self) -> &[StyleLayer] {
        &self.layers
    }

    /// Zuletzt angeforderte Kamerafahrt.
    pub fn camera_target(&self) -> Option<CameraTarget> {
        self.last_target
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn journal(&self) -> &[EngineOp] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }
}

impl MapEngine for HeadlessEngine {
    fn mount(&mut self, config: &MountConfig) -> Result<(), EngineError> {
        if let Some(message) = &self.mount_failure {
            return Err(EngineError::Mount(message.clone()));
        }
        if self.mounted {
            return Ok(());
        }

        self.mounted = true;
        self.layers = self.style_template.clone();
        self.max_bounds = Some(config.max_bounds);
        self.camera = CameraView {
            center: config.max_bounds.clamp(config.center),
            zoom: config.zoom,
        };
        self.navigation_control = config.navigation_control;
        self.journal.push(EngineOp::Mounted);

        if self.auto_style_load {
            self.events.push_back(EngineEvent::StyleLoaded);
        }
        Ok(())
    }

    fn unmount(&mut self) {
        if !self.mounted && self.elements.is_empty() {
            return;
        }
        self.mounted = false;
        self.layers.clear();
        self.elements.clear();
        self.markers.clear();
        self.popups.clear();
        self.controls.clear();
        self.listeners.clear();
        self.navigation_control = false;
        self.animation = None;
        self.events.retain(|e| matches!(e, EngineEvent::TimerElapsed(_)));
        self.journal.push(EngineOp::Unmounted);
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn style_layers(&self) -> Vec<StyleLayer> {
        self.layers.clone()
    }

    fn set_layer_visible(&mut self, layer_id: &str, visible: bool) -> Result<(), EngineError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.id == layer_id)
            .ok_or_else(|| EngineError::UnknownLayer(layer_id.to_string()))?;
        if layer.visible != visible {
            layer.visible = visible;
            if !visible {
                self.journal.push(EngineOp::LayerHidden(layer_id.to_string()));
            }
        }
        Ok(())
    }

    fn has_stylesheet(&self, id: &str) -> bool {
        self.stylesheets.contains_key(id)
    }

    fn register_stylesheet(&mut self, id: &str, css: &str) {
        self.stylesheets.insert(id.to_string(), css.to_string());
        self.journal.push(EngineOp::StylesheetRegistered(id.to_string()));
    }

    fn ease_to(&mut self, target: &CameraTarget) {
        if !self.mounted {
            return;
        }
        let from = self.camera();
        let mut target = *target;
        if let Some(bounds) = &self.max_bounds {
            target.center = bounds.clamp(target.center);
        }
        self.animation = Some(CameraAnimation {
            from,
            target,
            started_ms: self.clock_ms,
        });
        self.last_target = Some(target);
        self.journal.push(EngineOp::CameraEased(target));
    }

    fn camera(&self) -> CameraView {
        match &self.animation {
            Some(anim) => {
                let elapsed = Duration::from_millis(self.clock_ms - anim.started_ms);
                anim.from
                    .lerp(&anim.target.view(), anim.target.progress(elapsed))
            }
            None => self.camera,
        }
    }

    fn add_marker(&mut self, element: VisualNode, position: LngLat) -> Result<MarkerId, EngineError> {
        if !self.mounted {
            return Err(EngineError::NotMounted);
        }
        let root = self.insert_tree(element, None, Surface::Marker, Some(position));
        let id = MarkerId(self.next_id());
        self.markers.insert(id, MarkerEntry { root });
        self.journal.push(EngineOp::MarkerAdded(id));
        Ok(id)
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if let Some(entry) = self.markers.shift_remove(&id) {
            self.remove_tree(entry.root);
            self.journal.push(EngineOp::MarkerRemoved(id));
        }
    }

    fn set_marker_class(&mut self, id: MarkerId, class: &str, enabled: bool) {
        let Some(root) = self.markers.get(&id).map(|m| m.root) else {
            return;
        };
        if let Some(el) = self.elements.get_mut(&root) {
            let present = el.has_class(class);
            if enabled && !present {
                el.classes.push(class.to_string());
            } else if !enabled && present {
                el.classes.retain(|c| c != class);
            }
        }
    }

    fn add_popup(
        &mut self,
        content: VisualNode,
        position: LngLat,
        options: &PopupOptions,
    ) -> Result<PopupId, EngineError> {
        if !self.mounted {
            return Err(EngineError::NotMounted);
        }
        let root = self.insert_tree(content, None, Surface::Popup, Some(position));
        let id = PopupId(self.next_id());
        self.popups.insert(
            id,
            PopupEntry {
                root,
                position,
                options: *options,
            },
        );
        self.journal.push(EngineOp::PopupAdded(id));
        Ok(id)
    }

    fn set_popup_content(&mut self, id: PopupId, content: VisualNode) {
        let Some((old_root, position)) = self.popups.get(&id).map(|p| (p.root, p.position)) else {
            return;
        };
        self.remove_tree(old_root);
        let root = self.insert_tree(content, None, Surface::Popup, Some(position));
        if let Some(entry) = self.popups.get_mut(&id) {
            entry.root = root;
        }
        self.journal.push(EngineOp::PopupContentReplaced(id));
    }

    fn remove_popup(&mut self, id: PopupId) {
        if let Some(entry) = self.popups.shift_remove(&id) {
            self.remove_tree(entry.root);
            self.journal.push(EngineOp::PopupRemoved(id));
        }
    }

    fn add_control(
        &mut self,
        element: VisualNode,
        corner: ControlCorner,
    ) -> Result<ControlId, EngineError> {
        if !self.mounted {
            return Err(EngineError::NotMounted);
        }
        let root = self.insert_tree(element, None, Surface::Control, None);
        let id = ControlId(self.next_id());
        self.controls.insert(id, ControlEntry { root, corner });
        self.journal.push(EngineOp::ControlAdded(id));
        Ok(id)
    }

    fn remove_control(&mut self, id: ControlId) {
        if let Some(entry) = self.controls.shift_remove(&id) {
            self.remove_tree(entry.root);
            self.journal.push(EngineOp::ControlRemoved(id));
        }
    }

    fn on_click(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.push(id);
        self.journal.push(EngineOp::ListenerAdded(id));
        id
    }

    fn off_click(&mut self, id: ListenerId) {
        let before = self.listeners.len();
        self.listeners.retain(|l| *l != id);
        if self.listeners.len() != before {
            self.journal.push(EngineOp::ListenerRemoved(id));
        }
    }

    fn set_timeout(&mut self, delay: Duration, token: TimerToken) {
        let seq = self.next_id();
        self.timers.push(PendingTimer {
            due_ms: self.clock_ms + delay.as_millis() as u64,
            seq,
            token: token.clone(),
        });
        self.journal.push(EngineOp::TimerScheduled(token));
    }

    fn closest(&self, target: ElementId, class: &str) -> Option<ElementId> {
        let mut cursor = Some(target);
        while let Some(id) = cursor {
            let el = self.elements.get(&id)?;
            if el.has_class(class) {
                return Some(id);
            }
            cursor = el.parent;
        }
        None
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }
}
