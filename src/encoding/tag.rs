//! Runtime type tags and the tagged-value classifier.

use bitflags::bitflags;
use strum::{EnumCount, EnumIter};

use crate::encoding::{EncodingProfile, RawValue};

/// Mask selecting the type tag bits in an object header's flags word.
pub const RUBY_T_MASK: u64 = 0x1f;

/// Shift turning a static-symbol `VALUE` into its ID.
pub const RUBY_SPECIAL_SHIFT: u32 = 8;

/// Runtime type identifier of a `VALUE`.
///
/// Derived from the word's bit pattern (immediates) or the pointed-to object
/// header (heap values); never stored in the target. The numeric values are
/// the `RUBY_T_*` constants of the runtime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount)]
pub enum TypeTag {
    /// Plain object with instance variables (0x01)
    Object = 0x01,
    /// Class (0x02)
    Class = 0x02,
    /// Module (0x03)
    Module = 0x03,
    /// Heap-boxed float (0x04); an immediate flonum also classifies here
    Float = 0x04,
    /// String (0x05)
    String = 0x05,
    /// Regular expression (0x06)
    Regexp = 0x06,
    /// Array (0x07)
    Array = 0x07,
    /// Hash (0x08)
    Hash = 0x08,
    /// Struct (0x09)
    Struct = 0x09,
    /// Arbitrary-precision integer (0x0a)
    Bignum = 0x0a,
    /// IO object (0x0b)
    File = 0x0b,
    /// Wrapped C data (0x0c)
    Data = 0x0c,
    /// Regexp match context (0x0d)
    Match = 0x0d,
    /// Complex number (0x0e)
    Complex = 0x0e,
    /// Exact fraction (0x0f)
    Rational = 0x0f,
    /// The `nil` singleton (0x11)
    Nil = 0x11,
    /// The `true` singleton (0x12)
    True = 0x12,
    /// The `false` singleton (0x13)
    False = 0x13,
    /// Interned symbol (0x14)
    Symbol = 0x14,
    /// Immediate small integer (0x15)
    Fixnum = 0x15,
    /// Internal undefined sentinel (0x1b)
    Undef = 0x1b,
    /// Internal AST node (0x1c)
    Node = 0x1c,
    /// Internal include wrapper class (0x1d)
    IClass = 0x1d,
    /// Object awaiting finalization (0x1e)
    Zombie = 0x1e,
}

impl TypeTag {
    /// Map masked header bits back to a tag, or `None` for a value outside the
    /// documented set (which a hostile target can trivially produce).
    #[must_use]
    pub fn from_bits(bits: u64) -> Option<TypeTag> {
        Some(match bits {
            0x01 => TypeTag::Object,
            0x02 => TypeTag::Class,
            0x03 => TypeTag::Module,
            0x04 => TypeTag::Float,
            0x05 => TypeTag::String,
            0x06 => TypeTag::Regexp,
            0x07 => TypeTag::Array,
            0x08 => TypeTag::Hash,
            0x09 => TypeTag::Struct,
            0x0a => TypeTag::Bignum,
            0x0b => TypeTag::File,
            0x0c => TypeTag::Data,
            0x0d => TypeTag::Match,
            0x0e => TypeTag::Complex,
            0x0f => TypeTag::Rational,
            0x11 => TypeTag::Nil,
            0x12 => TypeTag::True,
            0x13 => TypeTag::False,
            0x14 => TypeTag::Symbol,
            0x15 => TypeTag::Fixnum,
            0x1b => TypeTag::Undef,
            0x1c => TypeTag::Node,
            0x1d => TypeTag::IClass,
            0x1e => TypeTag::Zombie,
            _ => return None,
        })
    }

    /// Target struct name of the heap representation, where one exists.
    ///
    /// Used by the pretty-printer registration to match statically-typed
    /// inferior values.
    #[must_use]
    pub fn struct_name(&self) -> Option<&'static str> {
        Some(match self {
            TypeTag::Object => "struct RObject",
            TypeTag::Class | TypeTag::Module | TypeTag::IClass => "struct RClass",
            TypeTag::Float => "struct RFloat",
            TypeTag::String => "struct RString",
            TypeTag::Regexp => "struct RRegexp",
            TypeTag::Array => "struct RArray",
            TypeTag::Hash => "struct RHash",
            TypeTag::File => "struct RFile",
            TypeTag::Complex => "struct RComplex",
            TypeTag::Rational => "struct RRational",
            _ => return None,
        })
    }
}

bitflags! {
    /// Option bits of a compiled regular expression, as stored by the regexp engine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegexpOptions: u32 {
        /// Case-insensitive matching
        const IGNORECASE = 1 << 0;
        /// Extended (whitespace-insensitive) syntax
        const EXTEND = 1 << 1;
        /// `.` matches newline
        const MULTILINE = 1 << 2;
    }
}

/// Classify an immediate value without touching target memory.
///
/// Returns `None` when the word is a heap pointer, in which case the caller must
/// read the object header to finish classification. The check order encodes real
/// overlaps between the bit patterns (e.g. `false` is all-zero and would otherwise
/// match nothing, `true` on flonum builds would otherwise look like a flonum), so
/// first match wins:
///
/// 1. canonical `false` / `nil` / `true` / `undef` patterns
/// 2. fixnum flag
/// 3. flonum discriminant
/// 4. symbol discriminant
#[must_use]
pub fn classify_immediate(raw: RawValue, profile: &EncodingProfile) -> Option<TypeTag> {
    let word = raw.0;

    if word == 0 {
        return Some(TypeTag::False);
    }
    if word == profile.qnil {
        return Some(TypeTag::Nil);
    }
    if word == profile.qtrue {
        return Some(TypeTag::True);
    }
    if word == profile.qundef {
        return Some(TypeTag::Undef);
    }

    if word & profile.fixnum_flag != 0 {
        return Some(TypeTag::Fixnum);
    }
    if profile.is_flonum(word) {
        return Some(TypeTag::Float);
    }
    if word & profile.symbol_mask == profile.symbol_flag {
        return Some(TypeTag::Symbol);
    }

    None
}
