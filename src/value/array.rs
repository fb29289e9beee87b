//! Array decoding: embedded vs heap-backed element storage, with cycle detection.

use log::debug;

use crate::{
    encoding::RawValue,
    render::VisitedSet,
    value::{ProxyValue, Session},
    Error, Result,
};

/// Bits available for the embedded length in the header flags.
const EMBED_LEN_MASK: u64 = 3;
/// Offset of the embedded-length bits above the user-flag shift.
const EMBED_LEN_SHIFT: u32 = 3;
/// Upper bound on elements decoded from a single array. A heap length above
/// this is either garbage or more than anyone wants printed.
pub(crate) const MAX_ARRAY_ELEMENTS: u64 = 1 << 16;

/// Number of elements, from the packed header bits (embedded) or the heap
/// length field.
pub(crate) fn len(session: &Session<'_>, raw: RawValue) -> Result<u64> {
    let flags = session.basic_flags(raw)?;
    if flags & session.profile().fl_user(1) != 0 {
        let shift = session.profile().user_flag_shift + EMBED_LEN_SHIFT;
        Ok((flags >> shift) & EMBED_LEN_MASK)
    } else {
        session.read_struct_field("struct RArray", raw.address(), &["as.heap.len"])
    }
}

/// Element `index`, bounds-checked against the decoded length.
pub(crate) fn get(session: &Session<'_>, raw: RawValue, index: u64) -> Result<RawValue> {
    if index >= len(session, raw)? {
        return Err(corrupt_error!("array index {} out of range at {}", index, raw));
    }

    let flags = session.basic_flags(raw)?;
    let base = if flags & session.profile().fl_user(1) != 0 {
        let ary = session.struct_field("struct RArray", &["as.ary"])?;
        raw.address()
            .checked_add(ary.offset)
            .ok_or(Error::OutOfBounds)?
    } else {
        session.read_struct_field("struct RArray", raw.address(), &["as.heap.ptr"])?
    };

    let word = session.mem().word_size();
    let address = session.mem().element_address(base, index, word)?;
    Ok(RawValue(session.mem().read_word(address)?))
}

/// Element sequence with each element recursively decoded; re-entry yields the
/// `[...]` cycle placeholder.
pub(crate) fn proxy(
    session: &Session<'_>,
    raw: RawValue,
    visited: &mut VisitedSet,
) -> Result<ProxyValue> {
    if visited.contains(raw.address()) {
        return Ok(ProxyValue::Cycle("[...]"));
    }
    visited.insert(raw.address());

    let count = len(session, raw)?;
    if count > MAX_ARRAY_ELEMENTS {
        debug!(
            "array at {} claims {} elements, decoding only {}",
            raw, count, MAX_ARRAY_ELEMENTS
        );
    }
    let count = count.min(MAX_ARRAY_ELEMENTS);
    let mut items = Vec::with_capacity(count.min(1024) as usize);
    for i in 0..count {
        let element = get(session, raw, i)?;
        items.push(session.proxy_value(&session.decode(element), visited));
    }
    Ok(ProxyValue::Seq(items))
}
