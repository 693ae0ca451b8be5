//! Like-Zähler eines Popups (lokal, nicht persistent).

/// Like-Zustand einer einzelnen Popup-Instanz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeState {
    pub liked: bool,
    pub count: u32,
}

impl LikeState {
    /// Frischer Zustand mit Startwert aus dem Katalog.
    pub fn seeded(count: u32) -> Self {
        Self {
            liked: false,
            count,
        }
    }

    /// Optimistisches Umschalten (reine Transformation).
    #[must_use]
    pub fn toggle(self) -> Self {
        if self.liked {
            Self {
                liked: false,
                count: self.count.saturating_sub(1),
            }
        } else {
            Self {
                liked: true,
                count: self.count.saturating_add(1),
            }
        }
    }
}
