//! Use-Cases der Application-Layer-Orchestrierung.

pub mod lifecycle;
pub mod popup;
pub mod selection;
pub mod upload;
