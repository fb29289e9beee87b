//! Hash decoding over the runtime's internal table, with streaming rendering.

use log::debug;

use crate::{
    encoding::RawValue,
    render::{ReprWriter, VisitedSet, WriteResult},
    tables::StTable,
    value::{write_fallback, ProxyValue, Session},
    Result,
};

fn table_entries(session: &Session<'_>, raw: RawValue) -> Result<Vec<(u64, u64)>> {
    let ntbl = session.read_struct_field("struct RHash", raw.address(), &["ntbl"])?;
    StTable::new(session, ntbl).entries()
}

/// Key/value mapping with both sides recursively decoded; re-entry yields the
/// `{...}` cycle placeholder and a null table is an empty hash.
pub(crate) fn proxy(
    session: &Session<'_>,
    raw: RawValue,
    visited: &mut VisitedSet,
) -> Result<ProxyValue> {
    if visited.contains(raw.address()) {
        return Ok(ProxyValue::Cycle("{...}"));
    }
    visited.insert(raw.address());

    let mut entries = Vec::new();
    for (key, value) in table_entries(session, raw)? {
        entries.push((
            session.proxy_value(&session.decode(RawValue(key)), visited),
            session.proxy_value(&session.decode(RawValue(value)), visited),
        ));
    }
    Ok(ProxyValue::Map(entries))
}

/// Stream `{key => value, ...}` into the bounded writer.
///
/// The table is read in full before the opening brace so a corrupt table
/// degrades to the address fallback instead of emitting half a literal.
pub(crate) fn write_repr(
    session: &Session<'_>,
    raw: RawValue,
    out: &mut ReprWriter,
    visited: &mut VisitedSet,
) -> WriteResult {
    if visited.contains(raw.address()) {
        return out.write("{...}");
    }
    visited.insert(raw.address());

    let entries = match table_entries(session, raw) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("hash at {} degraded to fallback: {}", raw, e);
            return write_fallback(out, raw);
        }
    };

    out.write("{")?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            out.write(", ")?;
        }
        session.write_repr(&session.decode(RawValue(*key)), out, visited)?;
        out.write(" => ")?;
        session.write_repr(&session.decode(RawValue(*value)), out, visited)?;
    }
    out.write("}")
}
