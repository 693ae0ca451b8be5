//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Konfiguration und Theme, die von `app`, `overlay` und `engine`
//! gemeinsam genutzt werden, ohne dass diese sich gegenseitig kennen müssen.

pub mod options;
pub mod theme;

pub use options::MapOptions;
pub use options::{ACTIVE_ZOOM, DEFAULT_CENTER, DEFAULT_ZOOM, MAX_BOUNDS};
