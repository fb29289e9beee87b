//! IO object rendering: `#<ClassName:path>` with descriptor fallbacks.

use log::debug;

use crate::{
    encoding::RawValue,
    render::{ReprWriter, VisitedSet, WriteResult},
    value::{class, write_fallback, ProxyValue, Session},
    Error, Result,
};

struct FileParts {
    class_name: String,
    path: Option<String>,
    fd: i32,
}

fn file_parts(session: &Session<'_>, raw: RawValue) -> Result<Option<FileParts>> {
    let fptr = session.read_struct_field("struct RFile", raw.address(), &["fptr"])?;
    if fptr == 0 {
        return Ok(None);
    }

    let fd_field = session.struct_field("rb_io_t", &["fd"])?;
    let fd_address = fptr.checked_add(fd_field.offset).ok_or(Error::OutOfBounds)?;
    let fd = session.mem().read_i32(fd_address)?;

    let pathv = RawValue(session.read_struct_field("rb_io_t", fptr, &["pathv"])?);
    let path = match session.proxy(pathv) {
        ProxyValue::Str(path) if !path.is_empty() => Some(path),
        _ => None,
    };

    let klass = session.klass_of(raw)?;
    let tag = session.classify(klass)?;
    Ok(Some(FileParts {
        class_name: class::name(session, klass, tag),
        path,
        fd,
    }))
}

/// Stream `#<ClassName:<path or fd N>>`, appending ` (closed)` for a negative
/// descriptor. An IO object with no descriptor struct gets the default opaque
/// rendering.
pub(crate) fn write_repr(
    session: &Session<'_>,
    raw: RawValue,
    out: &mut ReprWriter,
    _visited: &mut VisitedSet,
) -> WriteResult {
    let parts = match file_parts(session, raw) {
        Ok(Some(parts)) => parts,
        Ok(None) => return write_fallback(out, raw),
        Err(e) => {
            debug!("file at {} degraded to fallback: {}", raw, e);
            return write_fallback(out, raw);
        }
    };

    out.write("#<")?;
    out.write(&parts.class_name)?;
    out.write(":")?;
    if let Some(path) = &parts.path {
        out.write(path)?;
    } else if parts.fd >= 0 {
        out.write(&format!("fd {}", parts.fd))?;
    }
    if parts.fd < 0 {
        out.write(" (closed)")?;
    }
    out.write(">")
}
