use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::SlotKey;
use storage::repository::NotesRepository;

use crate::error::NotesError;
use crate::generation::GenerationClient;

/// Study-notes facade: requests a fresh document from the generation
/// service and keeps the last copy in storage.
///
/// Rendering, clipboard, and download belong to the presentation layer;
/// this service only owns the round-trip.
#[derive(Clone)]
pub struct NotesService {
    client: GenerationClient,
    notes: Arc<dyn NotesRepository>,
    clock: Clock,
}

impl NotesService {
    #[must_use]
    pub fn new(client: GenerationClient, notes: Arc<dyn NotesRepository>, clock: Clock) -> Self {
        Self {
            client,
            notes,
            clock,
        }
    }

    /// Generate fresh notes and persist them under `slot`.
    ///
    /// # Errors
    ///
    /// Returns `NotesError::Generation` when the service is unavailable or
    /// returns an unusable document, and `NotesError::Storage` when the
    /// result cannot be persisted.
    pub async fn refresh(&self, slot: &SlotKey) -> Result<String, NotesError> {
        let body = self.client.generate_notes().await?;
        self.notes
            .save_notes(slot, &body, self.clock.now())
            .await?;
        Ok(body)
    }

    /// Load the last stored notes for `slot`.
    ///
    /// # Errors
    ///
    /// Returns `NotesError::Storage` when nothing is stored or storage
    /// fails.
    pub async fn load(&self, slot: &SlotKey) -> Result<String, NotesError> {
        Ok(self.notes.load_notes(slot).await?)
    }
}
