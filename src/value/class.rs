//! Class and module naming: cached classpath first, constant-tree search second.

use log::debug;

use crate::{
    encoding::{RawValue, TypeTag},
    render::{ReprWriter, VisitedSet, WriteResult},
    tables::{symbols, StTable},
    value::{ProxyValue, Session},
    Error, Result,
};

/// Ceiling on singleton-class chain hops, so garbage `super` pointers cannot loop.
const MAX_SINGLETON_HOPS: u32 = 128;

/// Follow singleton classes down to the first real class.
pub(crate) fn real_class(session: &Session<'_>, raw: RawValue) -> Result<RawValue> {
    let singleton = session.profile().fl_user(0);

    let mut class = raw;
    for _ in 0..MAX_SINGLETON_HOPS {
        if session.basic_flags(class)? & singleton == 0 {
            return Ok(class);
        }
        class = RawValue(session.read_struct_field("struct RClass", class.address(), &["super"])?);
    }
    Err(corrupt_error!("singleton chain at {} does not terminate", raw))
}

/// The class's instance-variable index table pointer.
///
/// Lives behind the class-extension pointer on most builds; older layouts keep
/// it directly on the class. Try the extension first, then the direct field.
pub(crate) fn iv_index_tbl(session: &Session<'_>, raw: RawValue) -> Result<u64> {
    let ext = session.read_struct_field("struct RClass", raw.address(), &["ptr"])?;
    let ext_layout = session.layout("rb_classext_t")?;
    if let Some(field) = ext_layout.field("iv_index_tbl") {
        return session.mem().read_field(ext, field);
    }
    session.read_struct_field("struct RClass", raw.address(), &["iv_index_tbl"])
}

fn classext_table(session: &Session<'_>, raw: RawValue, field: &str) -> Result<u64> {
    let ext = session.read_struct_field("struct RClass", raw.address(), &["ptr"])?;
    session.read_struct_field("rb_classext_t", ext, &[field])
}

/// Look up the hidden `__classpath__` instance variable holding the precomputed
/// dotted path.
fn classpath(session: &Session<'_>, raw: RawValue) -> Result<RawValue> {
    let Some(classpath_id) = session.classpath_id() else {
        return Err(Error::KeyNotFound(0));
    };

    let iv_tbl = classext_table(session, raw, "iv_tbl")?;
    if iv_tbl == 0 {
        return Err(Error::KeyNotFound(classpath_id));
    }
    Ok(RawValue(
        StTable::new(session, iv_tbl).lookup(classpath_id)?,
    ))
}

/// Depth-first search of the constant tree for a binding whose value is `target`.
///
/// First matching constant wins; sibling order is whatever the runtime's table
/// iteration produces, which is accepted nondeterminism. The visited set is
/// threaded through recursion and seeded with the root by the caller, so shared
/// and cyclic constant graphs are walked at most once per value.
fn search_for_class(
    session: &Session<'_>,
    from: RawValue,
    target: u64,
    visited: &mut VisitedSet,
) -> Result<Option<String>> {
    let const_tbl = classext_table(session, from, "const_tbl")?;
    if const_tbl == 0 {
        return Ok(None);
    }

    for (id, entry) in StTable::new(session, const_tbl).entries()? {
        // Constant entries are boxed; the bound value sits in the entry struct.
        let value = match session.read_struct_field("rb_const_entry_t", entry, &["value"]) {
            Ok(value) => value,
            Err(e) => {
                debug!("skipping unreadable constant entry at {entry:#x}: {e}");
                continue;
            }
        };

        if value == target {
            return Ok(Some(symbols::id_to_string(session, id)));
        }

        if visited.contains(value) {
            continue;
        }
        visited.insert(value);

        if matches!(
            session.classify(RawValue(value)),
            Ok(TypeTag::Class | TypeTag::Module)
        ) {
            if let Some(child) = search_for_class(session, RawValue(value), target, visited)? {
                return Ok(Some(format!(
                    "{}::{}",
                    symbols::id_to_string(session, id),
                    child
                )));
            }
        }
    }
    Ok(None)
}

/// Human-readable name of a class or module.
///
/// Strategy: the hidden classpath ivar if present; otherwise a constant-tree
/// search from the root object class; otherwise `Class:0xADDR`/`Module:0xADDR`.
#[must_use]
pub(crate) fn name(session: &Session<'_>, raw: RawValue, tag: TypeTag) -> String {
    match classpath(session, raw) {
        Ok(path) => {
            if let ProxyValue::Str(name) = session.proxy(path) {
                return name;
            }
            debug!("classpath of {} is not a string, searching constants", raw);
        }
        Err(Error::KeyNotFound(_)) => {}
        Err(e) => {
            debug!("classpath lookup at {} failed: {}", raw, e);
            return address_name(raw, tag);
        }
    }

    let root = match session.inferior().evaluate("rb_cObject") {
        Ok(root) => RawValue(root),
        Err(e) => {
            debug!("no rb_cObject to search from: {e}");
            return address_name(raw, tag);
        }
    };

    let mut visited = VisitedSet::new();
    visited.insert(root.address());
    match search_for_class(session, root, raw.address(), &mut visited) {
        Ok(Some(path)) => path,
        Ok(None) => address_name(raw, tag),
        Err(e) => {
            debug!("constant-tree search for {} failed: {}", raw, e);
            address_name(raw, tag)
        }
    }
}

fn address_name(raw: RawValue, tag: TypeTag) -> String {
    let word = if tag == TypeTag::Module {
        "Module"
    } else {
        "Class"
    };
    format!("{}:{:#x}", word, raw.address())
}

/// Stream `#<Name>` into the bounded writer.
pub(crate) fn write_repr(
    session: &Session<'_>,
    raw: RawValue,
    tag: TypeTag,
    out: &mut ReprWriter,
) -> WriteResult {
    out.write("#<")?;
    out.write(&name(session, raw, tag))?;
    out.write(">")
}
