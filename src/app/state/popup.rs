use crate::core::{LikeState, Site, SiteId};
use crate::engine::PopupId;
use crate::overlay::PopupView;

/// Frisch konstruiertes Popup einer Site mit eigenem Like-Zustand.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupInstance {
    pub site_id: SiteId,
    pub like: LikeState,
    pub image_url: String,
}

impl PopupInstance {
    /// Neue Instanz; der Like-Zustand startet immer beim Katalog-Wert.
    pub fn fresh(site: &Site, image_url: &str) -> Self {
        Self {
            site_id: site.id.clone(),
            like: LikeState::seeded(site.like_seed),
            image_url: image_url.to_string(),
        }
    }

    /// Darstellungsparameter für die Overlay-Factory.
    pub fn view<'a>(&'a self, location_label: &'a str) -> PopupView<'a> {
        PopupView {
            like: self.like,
            image_url: &self.image_url,
            location_label,
        }
    }
}

/// Popup-Slot der aktiven Selektion.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PopupState {
    /// Kein Popup
    #[default]
    Empty,
    /// Attach per Timer geplant, gültig nur für diese Generation
    Scheduled {
        instance: PopupInstance,
        generation: u64,
    },
    /// An der Karte angehängt
    Attached {
        instance: PopupInstance,
        popup_id: PopupId,
    },
}

impl PopupState {
    pub fn instance(&self) -> Option<&PopupInstance> {
        match self {
            PopupState::Empty => None,
            PopupState::Scheduled { instance, .. } | PopupState::Attached { instance, .. } => {
                Some(instance)
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, PopupState::Attached { .. })
    }

    /// Site des angehängten Popups.
    pub fn attached_site(&self) -> Option<&SiteId> {
        match self {
            PopupState::Attached { instance, .. } => Some(&instance.site_id),
            _ => None,
        }
    }

    pub fn popup_id(&self) -> Option<PopupId> {
        match self {
            PopupState::Attached { popup_id, .. } => Some(*popup_id),
            _ => None,
        }
    }
}
