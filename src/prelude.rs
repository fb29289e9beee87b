//! # rbscope Prelude
//!
//! Convenient re-exports of the types most integrations need: implement
//! [`Inferior`] over the host debugger, open a [`Session`], and hand raw words
//! to it.

/// The main error type for all rbscope operations
pub use crate::Error;

/// The result type used throughout rbscope
pub use crate::Result;

/// The host-debugger capability seam
pub use crate::inferior::{FieldLayout, Inferior, TypeLayout};

/// An uninterpreted VALUE word copied out of the target
pub use crate::encoding::RawValue;

/// Per-process encoding constants, detected once per session
pub use crate::encoding::EncodingProfile;

/// Runtime type identifier of a VALUE
pub use crate::encoding::TypeTag;

/// One inspection session against a paused target
pub use crate::value::Session;

/// Structured result of recursively decoding a value
pub use crate::value::ProxyValue;

/// A raw value paired with its selected decoder
pub use crate::value::{DecodeKind, DecodedValue};

/// Display-layer printer and its output cap
pub use crate::printer::{ValuePrinter, MAX_OUTPUT_LEN};
