//! Losgelöster visueller Knotenbaum (engine-unabhängig).

use crate::core::SiteId;
use indexmap::IndexMap;

/// Element-Art eines Knotens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Div,
    Span,
    Button,
    Img,
    Heading,
    Paragraph,
    Svg,
    Path,
}

/// Interaktion, die beim Klick auf einen Knoten ausgelöst wird.
///
/// Die Site wird bei der Erzeugung gebunden; das Klick-Event selbst
/// trägt keine Site-Information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    /// Marker angeklickt
    ActivateSite(SiteId),
    /// Schließen-Button im Popup
    ClosePopup(SiteId),
    /// Like-Button im Popup
    ToggleLike(SiteId),
    /// Bild-Upload im Popup anfordern
    RequestUpload(SiteId),
}

/// Visueller Knoten mit Klassen, Styles, Attributen und Kindern.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub tag: Tag,
    pub classes: Vec<String>,
    pub styles: IndexMap<String, String>,
    pub attributes: IndexMap<String, String>,
    pub text: Option<String>,
    pub action: Option<NodeAction>,
    /// Klick wird nach der eigenen Aktion nicht weitergereicht
    pub stop_propagation: bool,
    pub children: Vec<VisualNode>,
}

impl VisualNode {
    /// Erstellt einen leeren Knoten.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            styles: IndexMap::new(),
            attributes: IndexMap::new(),
            text: None,
            action: None,
            stop_propagation: false,
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
        self
    }

    pub fn style(mut self, key: &str, value: impl Into<String>) -> Self {
        self.styles.insert(key.to_string(), value.into());
        self
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn on_click(mut self, action: NodeAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn stop_propagation(mut self) -> Self {
        self.stop_propagation = true;
        self
    }

    pub fn child(mut self, child: VisualNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = VisualNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Prüft, ob der Knoten die Klasse trägt.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Tiefensuche nach dem ersten Knoten, der `pred` erfüllt (inkl. self).
    pub fn find(&self, pred: &dyn Fn(&VisualNode) -> bool) -> Option<&VisualNode> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(pred))
    }

    /// Sucht den Knoten mit der gegebenen Aktion.
    pub fn find_action(&self, action: &NodeAction) -> Option<&VisualNode> {
        self.find(&|n| n.action.as_ref() == Some(action))
    }

    /// Verketteter Textinhalt des Teilbaums.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Anzahl Knoten im Teilbaum (inkl. self).
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(VisualNode::node_count).sum::<usize>()
    }
}
