//! Visuelles Theme: Kategorie-Farben, Icon-Pfade und Marker-Stylesheet.

use crate::core::SiteCategory;
use crate::engine::MapEngine;

/// ID des einmalig registrierten Stylesheets.
pub const THEME_STYLESHEET_ID: &str = "custom-marker-styles";
/// CSS-Klasse jedes Site-Markers (Hit-Test per Vorfahren-Suche).
pub const MARKER_CLASS: &str = "site-marker";
/// CSS-Klasse des aktiven Markers.
pub const ACTIVE_CLASS: &str = "active";
/// CSS-Klasse des Markers unter dem Mauszeiger.
pub const HOVERED_CLASS: &str = "hovered";
/// Fallback-Farbe für unbekannte Kategorien.
pub const FALLBACK_COLOR: &str = "#3b82f6";

/// Hex-Farbe einer Kategorie.
pub fn category_color(category: SiteCategory) -> &'static str {
    match category {
        SiteCategory::Restaurant => "#ef4444",
        SiteCategory::Cafe => "#f59e0b",
        SiteCategory::Landmark => "#3b82f6",
        SiteCategory::Historical => "#8b5cf6",
        SiteCategory::Shopping => "#ec4899",
        SiteCategory::Photo => "#10b981",
        SiteCategory::Unknown => FALLBACK_COLOR,
    }
}

/// SVG-Pfaddaten des Kategorie-Icons (24×24 Viewbox).
pub fn category_icon_path(category: SiteCategory) -> &'static str {
    match category {
        SiteCategory::Restaurant => {
            "M3 2v7c0 1.1.9 2 2 2h4a2 2 0 0 0 2-2V2M7 2v20M21 15V2a5 5 0 0 0-5 5v6c0 1.1.9 2 2 2h3Zm0 0v7"
        }
        SiteCategory::Cafe => {
            "M10 2v2m4-2v2M6 8h12a2 2 0 0 1 2 2v9a4 4 0 0 1-4 4H8a4 4 0 0 1-4-4v-9a2 2 0 0 1 2-2Zm11 2h1a4 4 0 0 1 0 8h-1"
        }
        SiteCategory::Landmark => {
            "m3 21 18 0M4 18h16M6 18v-4m4 4v-4m4 4v-4m4 4v-4M4 14h16M6 14 12 9 18 14M12 9V6m-2-1h4"
        }
        SiteCategory::Historical => "m3 21 18 0M6 18h12M6 18v-8l6-4 6 4v8M10 18v-5h4v5",
        SiteCategory::Shopping => {
            "M6 2 3 6v14a2 2 0 0 0 2 2h14a2 2 0 0 0 2-2V6l-3-4ZM3 6h18M16 10a4 4 0 0 1-8 0"
        }
        SiteCategory::Photo | SiteCategory::Unknown => {
            "m12 3-1.912 5.813a2 2 0 0 1-1.275 1.275L3 12l5.813 1.912a2 2 0 0 1 1.275 1.275L12 21l1.912-5.813a2 2 0 0 1 1.275-1.275L21 12l-5.813-1.912a2 2 0 0 1-1.275-1.275L12 3Z"
        }
    }
}

/// Zerlegt SVG-Pfaddaten vor jedem `M`/`m`-Befehl in Teilpfade.
pub fn split_subpaths(path_data: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in path_data.char_indices() {
        if (c == 'M' || c == 'm') && i > start {
            parts.push(&path_data[start..i]);
            start = i;
        }
    }
    parts.push(&path_data[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Marker- und Popup-Stylesheet.
pub fn stylesheet() -> String {
    format!(
        ".{m} {{ width: 14px; height: 14px; border-radius: 50%; border: 2.5px solid white; \
         cursor: pointer; transition: all 0.35s cubic-bezier(0.34, 1.56, 0.64, 1); }}\n\
         .{m}.{h}, .{m}.{a} {{ width: 44px; height: 44px; }}\n\
         .{m}.{a} {{ border-width: 3px; }}\n\
         .{m} svg {{ opacity: 0; pointer-events: none; }}\n\
         .{m}.{h} svg, .{m}.{a} svg {{ opacity: 1; }}\n\
         .site-popup {{ border-radius: 16px; overflow: hidden; }}\n",
        m = MARKER_CLASS,
        a = ACTIVE_CLASS,
        h = HOVERED_CLASS,
    )
}

/// Registriert das Theme-Stylesheet genau einmal pro Engine.
///
/// Gibt `true` zurück, wenn das Stylesheet neu registriert wurde.
pub fn ensure_registered<E: MapEngine + ?Sized>(engine: &mut E) -> bool {
    if engine.has_stylesheet(THEME_STYLESHEET_ID) {
        return false;
    }
    engine.register_stylesheet(THEME_STYLESHEET_ID, &stylesheet());
    log::debug!("Theme-Stylesheet registriert");
    true
}
