//! The seam through which decoded values reach the host debugger's display layer.
//!
//! The host asks once per inspected value, with the value's static type name, whether
//! this crate wants to print it. A match returns a [`ValuePrinter`] whose display form
//! is the bounded, truncated repr; a miss returns `None` and the host falls back to
//! its default formatting.

use strum::IntoEnumIterator;

use crate::{
    encoding::{RawValue, TypeTag},
    value::Session,
};

/// Default output cap for one printed value, in bytes.
pub const MAX_OUTPUT_LEN: usize = 1024;

/// Printer for one raw value, bound to its session.
///
/// Its `Display` implementation produces the truncated display string the host
/// shows the user.
pub struct ValuePrinter<'s, 'i> {
    session: &'s Session<'i>,
    raw: RawValue,
}

impl std::fmt::Display for ValuePrinter<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.session.truncated_repr(self.raw, MAX_OUTPUT_LEN))
    }
}

impl<'i> Session<'i> {
    /// Offer to print a value of the given static type.
    ///
    /// Matches the runtime's value word type and the known heap struct spellings
    /// (with or without a trailing pointer marker); anything else is declined so
    /// the host can apply its own formatting.
    #[must_use]
    pub fn printer_for<'s>(&'s self, type_name: &str, raw: RawValue) -> Option<ValuePrinter<'s, 'i>> {
        if !type_matches(type_name) {
            return None;
        }
        Some(ValuePrinter { session: self, raw })
    }
}

fn type_matches(type_name: &str) -> bool {
    let base = type_name
        .strip_suffix('*')
        .unwrap_or(type_name)
        .trim();

    if base == "VALUE" || base == "ID" || base == "struct RBasic" {
        return true;
    }
    TypeTag::iter().any(|tag| tag.struct_name() == Some(base))
}
