//! In-memory todo medium for tests and ephemeral sessions.

use crate::error::CoordResult;
use crate::store::TodoMedium;
use std::sync::Mutex;

/// A [`TodoMedium`] holding its blob in memory.
///
/// Starts empty, mirroring a device whose local storage was never written
/// (or was cleared externally).
#[derive(Debug, Default)]
pub struct MemoryTodoMedium {
    blob: Mutex<Option<String>>,
}

impl MemoryTodoMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates external clearing of the medium.
    pub fn clear(&self) {
        *self.blob.lock().expect("medium lock poisoned") = None;
    }
}

impl TodoMedium for MemoryTodoMedium {
    fn read(&self) -> Option<String> {
        self.blob.lock().expect("medium lock poisoned").clone()
    }

    fn write(&self, blob: &str) -> CoordResult<()> {
        *self.blob.lock().expect("medium lock poisoned") = Some(blob.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_round_trips() {
        let medium = MemoryTodoMedium::new();
        assert!(medium.read().is_none());

        medium.write("[1]").expect("write");
        assert_eq!(medium.read().as_deref(), Some("[1]"));

        medium.clear();
        assert!(medium.read().is_none());
    }
}
