//! String decoding: embedded vs heap-backed storage.

use crate::{encoding::RawValue, value::Session, Error, Result};

/// Bits available for the embedded length in the header flags.
const EMBED_LEN_MASK: u64 = 31;
/// Offset of the embedded-length bits above the user-flag shift.
const EMBED_LEN_SHIFT: u32 = 2;

/// Ceiling on a single string read, so a corrupt length field cannot make the
/// host allocate without bound.
const MAX_STRING_BYTES: u64 = 1 << 20;

/// Read a string's bytes, choosing the embedded or heap-backed branch from the
/// no-embed flag bit.
///
/// Small strings live inline in the object slot with their length packed into
/// spare header flag bits; larger ones carry a pointer and length pair.
pub(crate) fn read(session: &Session<'_>, raw: RawValue) -> Result<String> {
    let flags = session.basic_flags(raw)?;
    let noembed = session.profile().fl_user(1);

    let (ptr, len) = if flags & noembed != 0 {
        let ptr = session.read_struct_field("struct RString", raw.address(), &["as.heap.ptr"])?;
        let len = session.read_struct_field("struct RString", raw.address(), &["as.heap.len"])?;
        (ptr, len)
    } else {
        let ary = session.struct_field("struct RString", &["as.ary"])?;
        let shift = session.profile().user_flag_shift + EMBED_LEN_SHIFT;
        let len = (flags >> shift) & EMBED_LEN_MASK;
        let ptr = raw
            .address()
            .checked_add(ary.offset)
            .ok_or(Error::OutOfBounds)?;
        (ptr, len)
    };

    if len > MAX_STRING_BYTES {
        return Err(corrupt_error!(
            "string at {} claims implausible length {}",
            raw,
            len
        ));
    }

    let bytes = session.mem().read_bytes(ptr, len as usize)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
