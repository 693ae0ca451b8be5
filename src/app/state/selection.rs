use crate::core::SiteId;

/// Auswahlbezogener Anwendungszustand (höchstens eine aktive Site).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Aktuell aktive Site (`None` = Standardansicht)
    pub active_site_id: Option<SiteId>,
    /// Wird bei jeder Reconciliation und beim Teardown erhöht;
    /// verzögerte Aufträge vergleichen dagegen
    pub generation: u64,
}

impl SelectionState {
    /// Erstellt einen leeren Selektionszustand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prüft, ob genau diese Site aktiv ist.
    pub fn is_active(&self, site_id: &SiteId) -> bool {
        self.active_site_id.as_ref() == Some(site_id)
    }

    /// Erhöht die Generation und gibt den neuen Wert zurück.
    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
