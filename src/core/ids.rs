//! Identifier allocation for locally created records.

use crate::errors::{Error, Result};
use chrono::Utc;

/// Hands out millisecond timestamps as ids, bumping by one when two
/// records are created within the same millisecond.
#[derive(Debug, Default, Clone)]
pub struct IdSequence {
    last: i64,
}

impl IdSequence {
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// # Errors
    /// Returns [`Error::IdsExhausted`] once `i64::MAX` has been handed out or observed.
    pub fn next_id(&mut self) -> Result<i64> {
        let following = self
            .last
            .checked_add(1)
            .ok_or(Error::IdsExhausted { last: self.last })?;
        self.last = Utc::now().timestamp_millis().max(following);
        Ok(self.last)
    }

    /// Ensures future ids are greater than `id`, e.g. after loading remote records.
    pub fn observe(&mut self, id: i64) {
        self.last = self.last.max(id);
    }
}
