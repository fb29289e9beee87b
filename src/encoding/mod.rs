//! Tagged-value encoding: detection, classification, and the raw value word.
//!
//! A Ruby `VALUE` is one machine word that is either an immediate scalar (fixnum,
//! static special, flonum, symbol) or a pointer to a heap object. Which bit patterns
//! mean what changed with the introduction of immediate floats, so nothing in this
//! crate interprets a word without an [`EncodingProfile`] describing the variant the
//! target was built with.
//!
//! # Key Types
//!
//! - [`RawValue`] - An uninterpreted `VALUE` word copied out of the target
//! - [`EncodingProfile`] - Per-process encoding constants, detected once per session
//! - [`TypeTag`] - The runtime type identifier derived from a word (plus heap header)

mod profile;
mod tag;

pub use profile::{EncodingProfile, SymbolTableLayout};
pub use tag::{classify_immediate, RegexpOptions, TypeTag, RUBY_SPECIAL_SHIFT, RUBY_T_MASK};

/// An uninterpreted `VALUE` word copied out of the target process.
///
/// This is a bit pattern, not a live reference: the target may have been mid-GC or
/// mid-corruption when it was read, and every interpretation of it must be prepared
/// for the pointee to be garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawValue(pub u64);

impl RawValue {
    /// The word viewed as a target address (meaningful for heap values only).
    #[must_use]
    pub fn address(&self) -> u64 {
        self.0
    }

    /// The word viewed as a signed integer (used for fixnum arithmetic).
    #[must_use]
    pub fn signed(&self) -> i64 {
        self.0 as i64
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for RawValue {
    fn from(word: u64) -> RawValue {
        RawValue(word)
    }
}
