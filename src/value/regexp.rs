//! Regular expression decoding: source string plus option bits.

use crate::{
    encoding::{RawValue, RegexpOptions},
    render::VisitedSet,
    value::{ProxyValue, Session},
    Error, Result,
};

/// Source text and option flags of a compiled regexp.
///
/// The source is a string value in its own right; the options live in the
/// engine's pattern buffer, reached through the `ptr` field.
pub(crate) fn proxy(
    session: &Session<'_>,
    raw: RawValue,
    visited: &mut VisitedSet,
) -> Result<ProxyValue> {
    let src = RawValue(session.read_struct_field("struct RRegexp", raw.address(), &["src"])?);
    let source = match session.proxy_value(&session.decode(src), visited) {
        ProxyValue::Str(s) => s,
        other => {
            return Err(corrupt_error!(
                "regexp source at {} is not a string: {}",
                raw,
                other
            ))
        }
    };

    let pattern = session.read_struct_field("struct RRegexp", raw.address(), &["ptr"])?;
    let options_field = session.struct_field("struct re_pattern_buffer", &["options"])?;
    let options_address = pattern
        .checked_add(options_field.offset)
        .ok_or(Error::OutOfBounds)?;
    let bits = session.mem().read_u32(options_address)?;

    Ok(ProxyValue::Regexp {
        source,
        options: RegexpOptions::from_bits_truncate(bits),
    })
}
