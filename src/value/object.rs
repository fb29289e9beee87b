//! Plain-object decoding: instance variables located through the class's index table.

use log::debug;

use crate::{
    encoding::RawValue,
    render::{ReprWriter, VisitedSet, WriteResult},
    tables::{symbols, StTable},
    value::{class, write_fallback, Session},
    Error, Result,
};

/// Elements that fit in the embedded instance-variable slot.
const EMBED_IVAR_CAP: u64 = 3;

/// Instance variables of an object, as `(name ID, value)` pairs in index-table order.
///
/// The index table lives on the object's real (non-singleton) class and maps each
/// ivar's ID to a slot index. Slots holding the undefined sentinel are unset and
/// skipped, and indexes are bounds-checked against the slot count rather than
/// trusted.
pub(crate) fn ivars(session: &Session<'_>, raw: RawValue) -> Result<Vec<(u64, RawValue)>> {
    let flags = session.basic_flags(raw)?;
    let embedded = flags & session.profile().fl_user(1) != 0;

    let (base, capacity) = if embedded {
        let ary = session.struct_field("struct RObject", &["as.ary"])?;
        let slots = raw
            .address()
            .checked_add(ary.offset)
            .ok_or(Error::OutOfBounds)?;
        (slots, EMBED_IVAR_CAP)
    } else {
        let ptr = session.read_struct_field("struct RObject", raw.address(), &["as.heap.ivptr"])?;
        let numiv =
            session.read_struct_field("struct RObject", raw.address(), &["as.heap.numiv"])?;
        (ptr, numiv)
    };

    let klass = session.klass_of(raw)?;
    let real = class::real_class(session, klass)?;
    let index_table = class::iv_index_tbl(session, real)?;

    let mem = session.mem();
    let word = mem.word_size();
    let qundef = session.profile().qundef;

    let mut result = Vec::new();
    for (id, index) in StTable::new(session, index_table).entries()? {
        if index >= capacity {
            debug!("ivar index {index} out of range at {raw}, skipping");
            continue;
        }
        let value = mem.read_word(mem.element_address(base, index, word)?)?;
        if value != qundef {
            result.push((id, RawValue(value)));
        }
    }
    Ok(result)
}

/// Stream `<ClassName @ivar=value ...>` into the bounded writer.
pub(crate) fn write_repr(
    session: &Session<'_>,
    raw: RawValue,
    out: &mut ReprWriter,
    visited: &mut VisitedSet,
) -> WriteResult {
    if visited.contains(raw.address()) {
        return out.write("<...>");
    }
    visited.insert(raw.address());

    let (name, fields) = match object_parts(session, raw) {
        Ok(parts) => parts,
        Err(e) => {
            debug!("object at {} degraded to fallback: {}", raw, e);
            return write_fallback(out, raw);
        }
    };

    out.write("<")?;
    out.write(&name)?;
    for (id, value) in fields {
        out.write(" ")?;
        out.write(&symbols::id_to_string(session, id))?;
        out.write("=")?;
        session.write_repr(&session.decode(value), out, visited)?;
    }
    out.write(">")
}

fn object_parts(session: &Session<'_>, raw: RawValue) -> Result<(String, Vec<(u64, RawValue)>)> {
    let klass = session.klass_of(raw)?;
    let tag = session.classify(klass)?;
    let name = class::name(session, klass, tag);
    Ok((name, ivars(session, raw)?))
}
