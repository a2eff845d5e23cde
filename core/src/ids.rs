//! Identifier generation for new records.

use uuid::Uuid;

use crate::types::Todo;

/// Hands out ids that are not already used in a collection.
///
/// Ids are random UUID v4 strings. A candidate that collides with an existing
/// record is discarded and a new one drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator;

impl IdGenerator {
    pub fn next(&self, existing: &[Todo]) -> String {
        self.next_from(existing, || Uuid::new_v4().to_string())
    }

    fn next_from(&self, existing: &[Todo], mut draw: impl FnMut() -> String) -> String {
        loop {
            let candidate = draw();
            if !existing.iter().any(|todo| todo.id == candidate) {
                return candidate;
            }
        }
    }
}
