//! Resolution between interned IDs and their names via the runtime's global symbol table.
//!
//! Two physical layouts exist. Older builds keep `global_symbols.id_str`, an `st_table`
//! mapping ID directly to a string value. Newer builds keep `global_symbols.ids`, a
//! two-level array of (string, ID) pairs indexed through the ID's serial number. The
//! session's profile records which one was detected; everything here degrades to a
//! named fallback string instead of failing, since an unresolvable symbol is an
//! expected condition when inspecting a hostile target.

use log::debug;

use crate::{
    encoding::{RawValue, SymbolTableLayout, RUBY_SPECIAL_SHIFT},
    tables::StTable,
    value::{array, ProxyValue, Session},
    Error, Result,
};

/// Low bits of an ID that carry its scope, not its serial number.
const ID_SCOPE_SHIFT: u32 = 4;

/// Name of a static-symbol `VALUE`, resolved through the global symbol table.
///
/// An undecodable ID yields the `<Unknown symbol ID 0xHEX>` placeholder as the
/// name rather than an error.
#[must_use]
pub(crate) fn symbol_name(session: &Session<'_>, raw: RawValue) -> String {
    id_to_string(session, raw.0 >> RUBY_SPECIAL_SHIFT)
}

/// Resolve an interned ID to its string, degrading to a placeholder on any failure.
#[must_use]
pub(crate) fn id_to_string(session: &Session<'_>, id: u64) -> String {
    match try_id_to_string(session, id) {
        Ok(name) => name,
        Err(e) => {
            debug!("symbol ID {id:#x} is unresolvable: {e}");
            format!("<Unknown symbol ID {id:#x}>")
        }
    }
}

fn try_id_to_string(session: &Session<'_>, id: u64) -> Result<String> {
    let symbols_addr = global_symbols(session)?;

    let value = match session.profile().symbol_table_layout {
        SymbolTableLayout::IdTable => {
            let table_ptr =
                session.read_struct_field("global_symbols", symbols_addr, &["id_str"])?;
            RawValue(StTable::new(session, table_ptr).lookup(id)?)
        }
        SymbolTableLayout::TieredArray => {
            let ids = RawValue(
                session.read_struct_field("global_symbols", symbols_addr, &["ids"])?,
            );
            let serial = id >> ID_SCOPE_SHIFT;

            // Each inner array holds (string, ID) pairs, so half its length is the
            // number of serials it covers.
            let unit = array::len(session, array::get(session, ids, 0)?)? / 2;
            if unit == 0 {
                return Err(corrupt_error!("empty first bucket in symbol id array"));
            }

            let outer = array::get(session, ids, serial / unit)?;
            array::get(session, outer, (serial % unit) * 2)?
        }
    };

    match session.proxy(value) {
        ProxyValue::Str(name) => Ok(name),
        other => Err(corrupt_error!(
            "symbol ID {:#x} resolved to a non-string: {}",
            id,
            other
        )),
    }
}

/// Reverse lookup: find the ID interned for `name`, if any.
///
/// Scans the whole symbol table; used only for the hidden `__classpath__` symbol,
/// which the session interns once.
#[must_use]
pub(crate) fn intern(session: &Session<'_>, name: &str) -> Option<u64> {
    match try_intern(session, name) {
        Ok(found) => found,
        Err(e) => {
            debug!("intern scan for '{name}' failed: {e}");
            None
        }
    }
}

fn try_intern(session: &Session<'_>, name: &str) -> Result<Option<u64>> {
    let symbols_addr = global_symbols(session)?;

    match session.profile().symbol_table_layout {
        SymbolTableLayout::IdTable => {
            let table_ptr =
                session.read_struct_field("global_symbols", symbols_addr, &["id_str"])?;
            for (id, value) in StTable::new(session, table_ptr).entries()? {
                if let ProxyValue::Str(s) = session.proxy(RawValue(value)) {
                    if s == name {
                        return Ok(Some(id));
                    }
                }
            }
        }
        SymbolTableLayout::TieredArray => {
            let ids = RawValue(
                session.read_struct_field("global_symbols", symbols_addr, &["ids"])?,
            );
            for outer in 0..array::len(session, ids)? {
                let bucket = array::get(session, ids, outer)?;
                let bucket_len = array::len(session, bucket)?;
                let mut i = 0;
                while i + 1 < bucket_len {
                    if let ProxyValue::Str(s) =
                        session.proxy(array::get(session, bucket, i)?)
                    {
                        if s == name {
                            return Ok(Some(
                                array::get(session, bucket, i + 1)?.0,
                            ));
                        }
                    }
                    i += 2;
                }
            }
        }
    }

    Ok(None)
}

fn global_symbols(session: &Session<'_>) -> Result<u64> {
    session
        .inferior()
        .lookup_symbol("global_symbols")
        .ok_or_else(|| Error::Inferior("no global_symbols symbol in target".to_string()))
}
