//! Kulturkarte Library.
//! Core-Funktionalität als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod engine;
pub mod errors;
pub mod overlay;
pub mod shared;
pub mod upload;

pub use app::{
    AppCommand, AppController, AppIntent, AppState, MapLifecycle, PopupState, SelectionState,
    VisualState,
};
pub use core::{
    CameraTarget, CameraView, Easing, GeoBounds, LikeState, LngLat, Site, SiteCatalog,
    SiteCategory, SiteId, SiteRecord,
};
pub use engine::{EngineEvent, EngineOp, HeadlessEngine, MapAdapter, MapEngine};
pub use errors::{ConfigurationError, EngineInitError, RaceGuardViolation, UploadError};
pub use shared::MapOptions;
pub use upload::{ImageBlob, ImageUploader, MemoryUploader};
