//! Bounded output accumulation and cycle detection for object-graph rendering.
//!
//! One [`VisitedSet`] and one [`ReprWriter`] exist per top-level rendering call; both
//! are threaded explicitly through the traversal. The writer bounds the work done on
//! deeply nested (but acyclic) structures, the visited set bounds self-referential
//! graphs, and between them every finite input terminates.

use std::collections::HashSet;

/// Signal that the output cap was reached mid-rendering.
///
/// Not an error: the partial output accumulated so far is valid and the top-level
/// caller appends a truncation marker to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncated;

/// Result of writing into a bounded buffer.
pub type WriteResult = Result<(), Truncated>;

/// String accumulator that stops accepting output once a byte cap is reached.
///
/// When a write would exceed the cap, the prefix that still fits is kept (cut on a
/// character boundary) and [`Truncated`] is returned; already-accumulated output is
/// never corrupted.
pub struct ReprWriter {
    buf: String,
    max_len: Option<usize>,
}

impl ReprWriter {
    /// Writer bounded to `max_len` bytes.
    #[must_use]
    pub fn bounded(max_len: usize) -> ReprWriter {
        ReprWriter {
            buf: String::new(),
            max_len: Some(max_len),
        }
    }

    /// Writer with no cap (used for payload-only traversals in tests).
    #[must_use]
    pub fn unbounded() -> ReprWriter {
        ReprWriter {
            buf: String::new(),
            max_len: None,
        }
    }

    /// Append `data`, truncating mid-token if the cap would be exceeded.
    ///
    /// # Errors
    /// Returns [`Truncated`] once the cap is reached; later writes also fail.
    pub fn write(&mut self, data: &str) -> WriteResult {
        if let Some(max_len) = self.max_len {
            let remaining = max_len.saturating_sub(self.buf.len());
            if data.len() > remaining {
                let mut cut = remaining;
                while cut > 0 && !data.is_char_boundary(cut) {
                    cut -= 1;
                }
                self.buf.push_str(&data[..cut]);
                return Err(Truncated);
            }
        }

        self.buf.push_str(data);
        Ok(())
    }

    /// Bytes accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// `true` if nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the accumulated output.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Heap addresses already entered during one top-level traversal.
///
/// An address is inserted *before* recursing into the value's children, so any
/// re-encounter mid-traversal is a cycle by construction, never a sibling.
#[derive(Debug, Default)]
pub struct VisitedSet {
    addresses: HashSet<u64>,
}

impl VisitedSet {
    /// Empty set for a fresh top-level call.
    #[must_use]
    pub fn new() -> VisitedSet {
        VisitedSet::default()
    }

    /// `true` if the address was already entered.
    #[must_use]
    pub fn contains(&self, address: u64) -> bool {
        self.addresses.contains(&address)
    }

    /// Record an address; returns `false` if it was already present.
    pub fn insert(&mut self, address: u64) -> bool {
        self.addresses.insert(address)
    }
}
