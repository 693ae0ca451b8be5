//! Overlay-Layer: losgelöste visuelle Knoten und deren Factory.

pub mod factory;
pub mod node;

pub use factory::{
    create_legend, create_marker, create_popup_content, create_site_count_badge, PopupView,
};
pub use node::{NodeAction, Tag, VisualNode};
