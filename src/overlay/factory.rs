//! Overlay-Factory: erzeugt losgelöste Marker-, Popup- und Panel-Knoten.
//!
//! Die Factory hängt nie etwas an die Karte, sie liefert nur Bäume.
//! Unbekannte Kategorien bekommen Fallback-Farbe und -Icon.

use super::node::{NodeAction, Tag, VisualNode};
use crate::core::{LikeState, Site, SiteCategory};
use crate::shared::theme;

/// Klasse des Popup-Containers.
pub const POPUP_CLASS: &str = "site-popup";
/// Klasse des Like-Zählers.
pub const LIKE_COUNT_CLASS: &str = "like-count";

/// Darstellungsparameter einer Popup-Instanz.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView<'a> {
    /// Like-Zustand dieser Instanz
    pub like: LikeState,
    /// Angezeigtes Bild (Katalog-URL oder Upload-Ersatz)
    pub image_url: &'a str,
    /// Ortsangabe in der Fußzeile
    pub location_label: &'a str,
}

/// Runder Marker in Kategorie-Farbe mit Icon.
///
/// Ein Klick löst `NodeAction::ActivateSite(site.id)` aus.
pub fn create_marker(site: &Site) -> VisualNode {
    VisualNode::new(Tag::Div)
        .class(theme::MARKER_CLASS)
        .attr("data-site", site.id.as_str())
        .style("background-color", theme::category_color(site.category))
        .child(category_icon(site.category, 22))
        .on_click(NodeAction::ActivateSite(site.id.clone()))
}

fn category_icon(category: SiteCategory, size: u32) -> VisualNode {
    let paths = theme::split_subpaths(theme::category_icon_path(category))
        .into_iter()
        .map(|d| VisualNode::new(Tag::Path).attr("d", d));

    VisualNode::new(Tag::Svg)
        .attr("width", size.to_string())
        .attr("height", size.to_string())
        .attr("viewBox", "0 0 24 24")
        .attr("fill", "none")
        .attr("stroke", "white")
        .attr("stroke-width", "2")
        .attr("stroke-linecap", "round")
        .attr("stroke-linejoin", "round")
        .children(paths)
}

/// Detail-Panel einer Site mit Bild, Beschreibung, Like- und Upload-Button.
///
/// Der Schließen-Button löst `NodeAction::ClosePopup(site.id)` aus; Like und
/// Upload stoppen die Klick-Weitergabe, damit sie die Selektion nie beenden.
pub fn create_popup_content(site: &Site, view: &PopupView<'_>) -> VisualNode {
    let color = theme::category_color(site.category);

    let image = VisualNode::new(Tag::Img)
        .class("popup-image")
        .attr("src", view.image_url)
        .attr("alt", site.name.as_str())
        .style("width", "100%")
        .style("height", "220px")
        .style("object-fit", "cover");

    let close = VisualNode::new(Tag::Button)
        .class("popup-close")
        .attr("aria-label", "close")
        .text("×")
        .on_click(NodeAction::ClosePopup(site.id.clone()));

    let title_section = VisualNode::new(Tag::Div)
        .class("popup-title")
        .child(VisualNode::new(Tag::Heading).text(site.name.as_str()))
        .child(
            VisualNode::new(Tag::Span)
                .class("category-label")
                .style("color", color)
                .style("background", format!("{color}15"))
                .text(site.category.label()),
        );

    let description = VisualNode::new(Tag::Paragraph)
        .class("popup-description")
        .text(site.description.as_str());

    let like_button = VisualNode::new(Tag::Button)
        .class("like-button")
        .style("background", if view.like.liked { "#fee2e2" } else { "#f3f4f6" })
        .child(
            VisualNode::new(Tag::Span)
                .class("like-heart")
                .text(if view.like.liked { "❤️" } else { "🤍" }),
        )
        .child(
            VisualNode::new(Tag::Span)
                .class(LIKE_COUNT_CLASS)
                .style("color", if view.like.liked { "#dc2626" } else { "#6b7280" })
                .text(view.like.count.to_string()),
        )
        .on_click(NodeAction::ToggleLike(site.id.clone()))
        .stop_propagation();

    let upload_button = VisualNode::new(Tag::Button)
        .class("upload-button")
        .attr("accept", "image/*")
        .text("Foto hochladen")
        .on_click(NodeAction::RequestUpload(site.id.clone()))
        .stop_propagation();

    let location = VisualNode::new(Tag::Div)
        .class("popup-location")
        .child(VisualNode::new(Tag::Span).text(view.location_label));

    let footer = VisualNode::new(Tag::Div)
        .class("popup-footer")
        .child(like_button)
        .child(upload_button)
        .child(location);

    VisualNode::new(Tag::Div)
        .class(POPUP_CLASS)
        .style("width", "340px")
        .child(image)
        .child(close)
        .child(
            VisualNode::new(Tag::Div)
                .class("popup-body")
                .child(title_section)
                .child(description)
                .child(footer),
        )
}

/// Legende mit einer Zeile pro Kategorie.
pub fn create_legend() -> VisualNode {
    let rows = SiteCategory::ALL.into_iter().map(|category| {
        VisualNode::new(Tag::Div)
            .class("legend-row")
            .child(
                VisualNode::new(Tag::Div)
                    .class("legend-swatch")
                    .style("background-color", theme::category_color(category))
                    .child(category_icon(category, 16)),
            )
            .child(VisualNode::new(Tag::Span).text(category.key()))
    });

    VisualNode::new(Tag::Div)
        .class("legend-panel")
        .child(VisualNode::new(Tag::Heading).text("Categories"))
        .children(rows)
}

/// Badge mit der Anzahl der Sites.
pub fn create_site_count_badge(count: usize) -> VisualNode {
    VisualNode::new(Tag::Div)
        .class("site-count-badge")
        .child(VisualNode::new(Tag::Div).class("pulse-dot"))
        .child(VisualNode::new(Tag::Span).text(format!("{count} Cultural Sites")))
}
