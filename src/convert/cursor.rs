//! The forward-only consumption cursor.

use tracing::trace;

/// Byte offset into the source marking how much of it is already attributed
/// to tree nodes. It never moves backwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the cursor to `offset`. Requests to move backwards are ignored.
    pub fn advance_to(&mut self, offset: usize) {
        if offset < self.offset {
            trace!(from = self.offset, to = offset, "ignoring backward cursor move");
            return;
        }
        self.offset = offset;
    }
}
