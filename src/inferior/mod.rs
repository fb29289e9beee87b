//! Access to the paused target process.
//!
//! Everything this crate knows about the inspected process flows through the [`Inferior`]
//! trait: raw memory reads, type layouts, symbol addresses, and expression evaluation.
//! The host debugger implements it; the decoders consume it. All four operations may fail
//! at any time, and the failure of a single read must never take down more than the value
//! currently being decoded.
//!
//! Type layouts use dotted field paths flattened across embedded structs and unions
//! (`"as.heap.ptr"`). Pointer indirection is never flattened: a decoder reads the pointer
//! word itself and switches to the pointee's layout.

use std::sync::Arc;

use crate::{Error, Result};

/// Capability interface onto the paused target process.
///
/// Implemented by the host debugger. The target is stopped for the duration of every
/// call, so no method needs to be re-entrant, but every method must tolerate being
/// asked about garbage: an unreadable address, an unknown type name, a symbol that
/// was stripped.
pub trait Inferior {
    /// Read `len` bytes of raw target memory starting at `address`.
    ///
    /// # Errors
    /// Returns an error if the range is not fully readable in the target.
    fn read_memory(&self, address: u64, len: usize) -> Result<Vec<u8>>;

    /// Look up the layout of a named target type, or `None` if the host has no
    /// debug information for it.
    fn lookup_type(&self, name: &str) -> Option<Arc<TypeLayout>>;

    /// Evaluate an expression in the target and return the resulting machine word.
    ///
    /// Used exactly once per session, to observe the runtime's `true` bit pattern.
    ///
    /// # Errors
    /// Returns an error if the expression cannot be evaluated.
    fn evaluate(&self, expression: &str) -> Result<u64>;

    /// Resolve a named symbol to its address in the target, or `None` if absent.
    fn lookup_symbol(&self, name: &str) -> Option<u64>;
}

/// Layout of one target type, as provided by the host's debug information.
///
/// Fields carry dotted paths for embedded aggregates, so a decoder can ask for
/// `"as.heap.len"` without modelling the intermediate union itself.
#[derive(Debug, Clone)]
pub struct TypeLayout {
    /// Type name as the host spells it, e.g. `"struct RString"`
    pub name: String,
    /// Total size of the type in bytes
    pub size: u64,
    /// All reachable fields, flattened across embedded structs and unions
    pub fields: Vec<FieldLayout>,
}

impl TypeLayout {
    /// Find a field by its dotted path.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// `true` if a field with the given dotted path exists.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// Location of one field within a [`TypeLayout`].
#[derive(Debug, Clone)]
pub struct FieldLayout {
    /// Dotted path of the field, e.g. `"as.heap.ptr"`
    pub name: String,
    /// Byte offset from the start of the enclosing type
    pub offset: u64,
    /// Size of the field's storage unit in bytes
    pub size: u64,
    /// For bitfields: `(bit_offset, bit_width)` within the storage unit,
    /// counting from the least significant bit. `None` for plain fields.
    pub bits: Option<(u32, u32)>,
}

impl FieldLayout {
    /// Plain (non-bitfield) field at a byte offset.
    #[must_use]
    pub fn plain(name: &str, offset: u64, size: u64) -> FieldLayout {
        FieldLayout {
            name: name.to_string(),
            offset,
            size,
            bits: None,
        }
    }

    /// Bitfield within a storage unit at a byte offset.
    #[must_use]
    pub fn bitfield(name: &str, offset: u64, size: u64, bit_offset: u32, bit_width: u32) -> FieldLayout {
        FieldLayout {
            name: name.to_string(),
            offset,
            size,
            bits: Some((bit_offset, bit_width)),
        }
    }
}

/// Typed read helpers over an [`Inferior`], parameterized by the target's pointer width.
///
/// All reads are little-endian and bounds-checked by the underlying memory interface;
/// a failed read surfaces as an error, never a panic.
#[derive(Clone, Copy)]
pub struct Mem<'i> {
    inferior: &'i dyn Inferior,
    pointer_width: u32,
}

impl<'i> Mem<'i> {
    /// Create read helpers for the given target.
    ///
    /// ## Arguments
    /// * 'inferior' - The target access interface
    /// * 'pointer_width' - Width of a machine word in bytes (4 or 8)
    #[must_use]
    pub fn new(inferior: &'i dyn Inferior, pointer_width: u32) -> Mem<'i> {
        Mem {
            inferior,
            pointer_width,
        }
    }

    /// Width of a machine word in the target, in bytes.
    #[must_use]
    pub fn word_size(&self) -> u64 {
        u64::from(self.pointer_width)
    }

    /// Read `len` raw bytes at `address`.
    ///
    /// # Errors
    /// Returns an error if the range is not readable.
    pub fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        self.inferior.read_memory(address, len)
    }

    /// Read one machine word at `address`, zero-extended to 64 bits.
    ///
    /// # Errors
    /// Returns an error if the word is not readable.
    pub fn read_word(&self, address: u64) -> Result<u64> {
        let len = self.pointer_width as usize;
        let bytes = self.read_bytes(address, len)?;
        if bytes.len() < len {
            return Err(Error::MemoryRead { address, len });
        }
        let mut word = 0u64;
        for (i, b) in bytes.iter().enumerate() {
            word |= u64::from(*b) << (i * 8);
        }
        Ok(word)
    }

    /// Read a 32-bit unsigned integer at `address`.
    ///
    /// # Errors
    /// Returns an error if the range is not readable.
    pub fn read_u32(&self, address: u64) -> Result<u32> {
        let bytes = self.read_bytes(address, 4)?;
        if bytes.len() < 4 {
            return Err(Error::MemoryRead { address, len: 4 });
        }
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a 32-bit signed integer at `address`.
    ///
    /// # Errors
    /// Returns an error if the range is not readable.
    pub fn read_i32(&self, address: u64) -> Result<i32> {
        Ok(self.read_u32(address)? as i32)
    }

    /// Read an IEEE754 double at `address`.
    ///
    /// # Errors
    /// Returns an error if the range is not readable.
    pub fn read_f64(&self, address: u64) -> Result<f64> {
        let bytes = self.read_bytes(address, 8)?;
        if bytes.len() < 8 {
            return Err(Error::MemoryRead { address, len: 8 });
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[..8]);
        Ok(f64::from_le_bytes(raw))
    }

    /// Read a field of a structure located at `base`, honoring bitfield packing.
    ///
    /// The field's storage unit (up to 8 bytes) is read little-endian and the
    /// bit range extracted if the field is a bitfield.
    ///
    /// # Errors
    /// Returns an error if the field's storage is not readable or its
    /// address would wrap around the address space.
    pub fn read_field(&self, base: u64, field: &FieldLayout) -> Result<u64> {
        let len = field.size.min(8).max(1) as usize;
        let address = base.checked_add(field.offset).ok_or(Error::OutOfBounds)?;
        let bytes = self.read_bytes(address, len)?;
        if bytes.len() < len {
            return Err(Error::MemoryRead { address, len });
        }
        let mut word = 0u64;
        for (i, b) in bytes.iter().enumerate() {
            word |= u64::from(*b) << (i * 8);
        }
        if let Some((bit_offset, bit_width)) = field.bits {
            let width = bit_width.min(63);
            word = (word >> bit_offset) & ((1u64 << width) - 1);
        }
        Ok(word)
    }

    /// Address of the `index`-th element of `stride` bytes starting at `base`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if the computed address would wrap
    /// around the address space.
    pub fn element_address(&self, base: u64, index: u64, stride: u64) -> Result<u64> {
        index
            .checked_mul(stride)
            .and_then(|offset| base.checked_add(offset))
            .ok_or(Error::OutOfBounds)
    }
}
