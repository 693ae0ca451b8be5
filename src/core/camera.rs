//! Kamera-Ziele und Easing-Kurven für Kartenanimationen.

use super::LngLat;
use std::time::Duration;

/// Easing-Kurve einer Kamerafahrt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Quadratisches Ease-Out: `t * (2 - t)`
    #[default]
    EaseOutQuad,
}

impl Easing {
    /// Bildet den Zeitanteil `t ∈ [0, 1]` auf den Weganteil ab.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutQuad => t * (2.0 - t),
        }
    }
}

/// Momentaner Kamerazustand (Mittelpunkt + Zoom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub center: LngLat,
    pub zoom: f64,
}

impl CameraView {
    /// Interpoliert zwischen zwei Ansichten mit bereits ge-easetem Anteil `k`.
    pub fn lerp(&self, other: &CameraView, k: f64) -> CameraView {
        CameraView {
            center: self.center.lerp(other.center, k),
            zoom: self.zoom + (other.zoom - self.zoom) * k,
        }
    }
}

/// Ziel einer Kamerafahrt (fire-and-forget, eine neue Fahrt überschreibt die alte).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub center: LngLat,
    pub zoom: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl CameraTarget {
    /// Zielansicht ohne Zeitparameter.
    pub fn view(&self) -> CameraView {
        CameraView {
            center: self.center,
            zoom: self.zoom,
        }
    }

    /// Fortschritt (0..=1, ge-eased) nach `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        self.easing
            .apply(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }
}
