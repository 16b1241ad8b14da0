//! In-memory storage, for tests and throwaway sessions.

use crate::error::StorageError;

use super::StateStorage;

/// Holds the payload in a `String`. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    payload: Option<String>,
    writes: usize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-existing payload.
    #[must_use]
    pub fn with_payload(payload: &str) -> Self {
        Self {
            payload: Some(payload.to_owned()),
            writes: 0,
        }
    }

    /// The last payload written.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    /// Number of successful saves.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.payload.clone())
    }

    fn save(&mut self, payload: &str) -> Result<(), StorageError> {
        self.payload = Some(payload.to_owned());
        self.writes += 1;
        Ok(())
    }
}
