//! Change classification and cursor types.

use std::fmt;

/// What a poll observed since the previous poll or seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeResult {
    /// Nothing new.
    NoChange,
    /// New entries were written after the cursor.
    Appended,
    /// The log was rotated, truncated, replaced or removed. The cursor is
    /// meaningless until the caller seeks again.
    Invalidated,
}

impl ChangeResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeResult::NoChange => "nop",
            ChangeResult::Appended => "append",
            ChangeResult::Invalidated => "invalidate",
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, ChangeResult::NoChange)
    }
}

impl fmt::Display for ChangeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical read position within a log.
///
/// Ordered by `(generation, offset)`. The generation increases whenever the
/// cursor is re-based onto a replaced or truncated log, so a cursor never
/// compares lower than any earlier value even when the byte offset shrinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    generation: u64,
    offset: u64,
}

impl Cursor {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Moves forward within the current generation. Never moves backward.
    pub(crate) fn advance_to(&mut self, offset: u64) {
        self.offset = self.offset.max(offset);
    }

    /// Starts a new generation at `offset`.
    pub(crate) fn rebase(&mut self, offset: u64) {
        self.generation += 1;
        self.offset = offset;
    }
}
