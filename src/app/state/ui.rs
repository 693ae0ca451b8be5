use crate::core::SiteId;
use crate::upload::ImageBlob;

/// Geprüftes Bild, das auf den Transport durch den Host wartet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpload {
    pub site_id: SiteId,
    pub blob: ImageBlob,
}

/// UI-bezogener Anwendungszustand
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Nutzer-Hinweis (z.B. abgelehnter Upload)
    pub notice: Option<String>,
    /// Site, für die die Dateiauswahl offen ist
    pub upload_picker: Option<SiteId>,
    /// Vom Host abzuholender Upload
    pub pending_upload: Option<PendingUpload>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entnimmt den wartenden Upload (Host startet damit den Transport).
    pub fn take_pending_upload(&mut self) -> Option<PendingUpload> {
        self.pending_upload.take()
    }
}
