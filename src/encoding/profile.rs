//! Detection of the target's value-encoding variant.
//!
//! With the introduction of immediate floating-point values ("flonums"), the bit
//! patterns for `true`, `false`, `nil` and the immediate mask all changed. The only
//! reliable way to tell which variant a stripped target was built with is to observe
//! a known-true value: `rb_equal(0, 0)` always returns the runtime's `true`, and its
//! bit pattern pins down the whole constant family.

use log::debug;

use crate::{inferior::Inferior, Error, Result};

/// Raw `true` observed on builds without immediate floats.
const QTRUE_LEGACY: u64 = 2;
/// Raw `true` observed on builds with immediate floats.
const QTRUE_FLONUM: u64 = 20;

/// Physical layout of the runtime's global symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolTableLayout {
    /// `global_symbols.id_str`: an `st_table` mapping ID directly to a string value.
    IdTable,
    /// `global_symbols.ids`: a two-level array of (string, ID) pairs indexed by
    /// the ID's serial number.
    TieredArray,
}

/// Process-wide constants describing how `VALUE` bits are interpreted.
///
/// Computed exactly once per session via [`EncodingProfile::detect`] and never
/// mutated afterwards; every decoder receives it by reference. Detection requires
/// evaluating an expression in the live (paused) target, which is why the result
/// is cached for the lifetime of the session rather than recomputed per value.
#[derive(Debug, Clone)]
pub struct EncodingProfile {
    /// Width of a `VALUE` in bytes (4 or 8)
    pub pointer_width: u32,
    /// The raw bit pattern of `true`
    pub qtrue: u64,
    /// The raw bit pattern of `nil`
    pub qnil: u64,
    /// The raw bit pattern of the internal `undef` sentinel
    pub qundef: u64,
    /// Bits that are non-zero for any immediate value
    pub immediate_mask: u64,
    /// Low bit set on every fixnum
    pub fixnum_flag: u64,
    /// Mask selecting the flonum discriminant bits (zero when the build has no flonums)
    pub flonum_mask: u64,
    /// Discriminant under [`EncodingProfile::flonum_mask`] identifying a flonum
    pub flonum_flag: u64,
    /// Mask selecting the static-symbol discriminant bits
    pub symbol_mask: u64,
    /// Discriminant under [`EncodingProfile::symbol_mask`] identifying a symbol
    pub symbol_flag: u64,
    /// Bit position where per-type user flags start in an object header
    pub user_flag_shift: u32,
    /// Whether this build carries an object trust bit below the user flags
    pub has_trust_bit: bool,
    /// Which physical symbol-table layout the runtime uses
    pub symbol_table_layout: SymbolTableLayout,
}

impl EncodingProfile {
    /// Determine the target's encoding variant by probing the live process.
    ///
    /// Evaluates `rb_equal(0, 0)` to observe the runtime's `true` bit pattern and
    /// derives all dependent constants from it. Trust-bit and symbol-table probes
    /// are best-effort and fall back to the modern defaults; an unrecognized `true`
    /// pattern is fatal for the whole session.
    ///
    /// # Errors
    /// Returns [`Error::ProfileDetection`] if the observed `true` matches neither
    /// known configuration, or the underlying evaluation error if the probe itself
    /// fails.
    pub fn detect(inferior: &dyn Inferior) -> Result<EncodingProfile> {
        let qtrue = inferior.evaluate("rb_equal(0, 0)")?;

        let mut profile = match qtrue {
            QTRUE_LEGACY => EncodingProfile {
                pointer_width: 8,
                qtrue,
                qnil: 4,
                qundef: 6,
                immediate_mask: 0x3,
                fixnum_flag: 0x1,
                // No value ANDed with the mask can equal the flag, so flonum
                // classification never fires on these builds.
                flonum_mask: 0x0,
                flonum_flag: 0x2,
                symbol_mask: 0xff,
                symbol_flag: 0xe,
                user_flag_shift: 12,
                has_trust_bit: true,
                symbol_table_layout: SymbolTableLayout::TieredArray,
            },
            QTRUE_FLONUM => EncodingProfile {
                pointer_width: 8,
                qtrue,
                qnil: 8,
                qundef: 52,
                immediate_mask: 0x7,
                fixnum_flag: 0x1,
                flonum_mask: 0x2,
                flonum_flag: 0x2,
                symbol_mask: 0xff,
                symbol_flag: 0xc,
                user_flag_shift: 12,
                has_trust_bit: true,
                symbol_table_layout: SymbolTableLayout::TieredArray,
            },
            other => return Err(Error::ProfileDetection(other)),
        };

        // Both probes below are diagnostic-symbol dependent and must not fail the
        // session when the target is stripped.
        profile.has_trust_bit = inferior.lookup_symbol("rb_obj_untrust").is_some();
        if !profile.has_trust_bit {
            profile.user_flag_shift = 11;
        }

        profile.symbol_table_layout = detect_symbol_table_layout(inferior);

        debug!(
            "detected encoding profile: qtrue={} ushift={} symtab={:?}",
            profile.qtrue, profile.user_flag_shift, profile.symbol_table_layout
        );
        Ok(profile)
    }

    /// Bit mask for user flag `n` in an object header.
    #[must_use]
    pub fn fl_user(&self, n: u32) -> u64 {
        1u64 << (self.user_flag_shift + n)
    }

    /// `true` when the word is an immediate (not a heap pointer).
    #[must_use]
    pub fn is_immediate(&self, word: u64) -> bool {
        word & self.immediate_mask != 0
    }

    /// `true` when the word carries the flonum discriminant.
    ///
    /// Always `false` on builds without immediate floats.
    #[must_use]
    pub fn is_flonum(&self, word: u64) -> bool {
        self.flonum_mask != 0 && word & self.flonum_mask == self.flonum_flag
    }
}

fn detect_symbol_table_layout(inferior: &dyn Inferior) -> SymbolTableLayout {
    match inferior.lookup_type("global_symbols") {
        Some(layout) if layout.has_field("id_str") => SymbolTableLayout::IdTable,
        Some(_) => SymbolTableLayout::TieredArray,
        None => {
            debug!("no layout for global_symbols, assuming tiered-array symbol table");
            SymbolTableLayout::TieredArray
        }
    }
}
