use crate::core::SiteId;
use crate::engine::{ElementId, EngineEvent, ListenerId, TimerToken};
use crate::errors::UploadError;
use crate::overlay::NodeAction;
use crate::upload::ImageBlob;

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus Engine/Host ohne direkte Mutationslogik.
#[derive(Debug, Clone, PartialEq)]
pub enum AppIntent {
    /// Host möchte die Karte mounten
    MountRequested,
    /// Style der Engine ist fertig geladen
    MapStyleLoaded,
    /// Marker einer Site angeklickt
    MarkerClicked { site_id: SiteId },
    /// Zeiger betritt/verlässt einen Marker
    MarkerHoverChanged { site_id: SiteId, hovered: bool },
    /// Schließen-Button im Popup
    PopupCloseClicked { site_id: SiteId },
    /// Klick auf die Karte an einen registrierten Listener
    MapClicked {
        listener: ListenerId,
        target: Option<ElementId>,
    },
    /// Verzögerter Popup-Attach ist fällig
    PopupAttachTimerElapsed { site_id: SiteId, generation: u64 },
    /// Like-Button im Popup
    LikeToggleClicked { site_id: SiteId },
    /// Upload-Button im Popup
    UploadRequested { site_id: SiteId },
    /// Nutzer hat eine Bilddatei gewählt
    ImageFileChosen { site_id: SiteId, blob: ImageBlob },
    /// Host meldet das Ergebnis des Transports
    ImageUploadFinished {
        site_id: SiteId,
        result: Result<String, UploadError>,
    },
    /// Dateiauswahl abgebrochen
    UploadCancelled,
    /// Hinweis-Meldung geschlossen
    NoticeDismissed,
    /// Karte abbauen
    TeardownRequested,
}

impl AppIntent {
    /// Übersetzt ein Engine-Event; Events ohne Bedeutung ergeben `None`.
    pub fn from_engine_event(event: EngineEvent) -> Option<Self> {
        match event {
            EngineEvent::StyleLoaded => Some(Self::MapStyleLoaded),
            EngineEvent::ElementAction(action) => Some(match action {
                NodeAction::ActivateSite(site_id) => Self::MarkerClicked { site_id },
                NodeAction::ClosePopup(site_id) => Self::PopupCloseClicked { site_id },
                NodeAction::ToggleLike(site_id) => Self::LikeToggleClicked { site_id },
                NodeAction::RequestUpload(site_id) => Self::UploadRequested { site_id },
            }),
            EngineEvent::Hover {
                action: NodeAction::ActivateSite(site_id),
                entered,
            } => Some(Self::MarkerHoverChanged {
                site_id,
                hovered: entered,
            }),
            EngineEvent::Hover { .. } => None,
            EngineEvent::MapClick(click) => Some(Self::MapClicked {
                listener: click.listener,
                target: click.target,
            }),
            EngineEvent::TimerElapsed(TimerToken::AttachPopup {
                site_id,
                generation,
            }) => Some(Self::PopupAttachTimerElapsed {
                site_id,
                generation,
            }),
        }
    }
}
